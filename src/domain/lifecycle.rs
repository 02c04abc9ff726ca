/// ドメイン層: アップロードのライフサイクル（状態機械）
///
/// 1回のアップロード試行を「選択 → 送信中 → 成功/失敗」として管理する。
/// 状態はこのモジュールの遷移関数だけが書き換える（reducer 方式）。
///
/// ```text
/// Idle --submit--> Uploading
/// Uploading --progress--> Uploading
/// Uploading --complete(200, JSON)--> Succeeded
/// Uploading --complete(200, not JSON)--> Failed
/// Uploading --complete(!=200)--> Failed
/// Uploading --transport error--> Failed
/// Succeeded|Failed --reset--> Idle
/// 任意の状態 --submit--> Uploading（新しい試行）
/// ```
///
/// # 古いコールバックの扱い
/// `submit` のたびに世代番号（`Generation`）を進め、各コールバックは
/// 自分の試行の世代を添えて呼ばれる。現在の世代と一致しないもの、
/// または `Uploading` 以外の状態に届いたものは無視する。
use crate::domain::error::UploadFailure;
use crate::domain::event::{TaggedEvent, UploadEvent};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// アップロード試行の世代番号
///
/// `submit` ごとに単調増加する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 状態の種類（データを持たない判別子）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

impl fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Uploading => "uploading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// アップロードの状態
///
/// 結果ペイロードとエラーは対応するバリアントにしか存在しないため、
/// 「成功なら結果のみ、失敗ならエラーのみ」が型で保証される。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading {
        progress_percent: u8,
    },
    Succeeded {
        payload: Value,
    },
    Failed {
        failure: UploadFailure,
    },
}

impl UploadState {
    pub fn phase(&self) -> UploadPhase {
        match self {
            Self::Idle => UploadPhase::Idle,
            Self::Uploading { .. } => UploadPhase::Uploading,
            Self::Succeeded { .. } => UploadPhase::Succeeded,
            Self::Failed { .. } => UploadPhase::Failed,
        }
    }

    /// 進捗率（`Uploading` 以外では 0）
    pub fn progress_percent(&self) -> u8 {
        match self {
            Self::Uploading { progress_percent } => *progress_percent,
            _ => 0,
        }
    }

    pub fn result_payload(&self) -> Option<&Value> {
        match self {
            Self::Succeeded { payload } => Some(payload),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&UploadFailure> {
        match self {
            Self::Failed { failure } => Some(failure),
            _ => None,
        }
    }

    /// ユーザー向けエラーメッセージ（失敗以外では空文字列）
    pub fn error_message(&self) -> String {
        self.failure().map(ToString::to_string).unwrap_or_default()
    }

    /// 表示・機械可読出力用のフラットな写し
    pub fn snapshot(&self) -> UploadSnapshot {
        UploadSnapshot {
            phase: self.phase(),
            progress_percent: self.progress_percent(),
            result_payload: self.result_payload().cloned(),
            error_message: self.error_message(),
        }
    }
}

/// `UploadState` のフラットな表現
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSnapshot {
    pub phase: UploadPhase,
    pub progress_percent: u8,
    pub result_payload: Option<Value>,
    pub error_message: String,
}

/// 送信済みバイト数から進捗率を計算する
///
/// `round(loaded * 100 / total)`（0.5 は切り上げ）。`total` が 0 の場合は
/// 計算できないので `None`。`loaded > total` は 100 に丸める。
pub fn percent_of(loaded: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let total = u128::from(total);
    let loaded = u128::from(loaded).min(total);
    let percent = (loaded * 100 + total / 2) / total;
    Some(percent as u8)
}

/// アップロードのライフサイクル
///
/// 状態と現在の世代番号を所有する。各コールバックは状態を変更したときだけ
/// `true` を返す。
#[derive(Debug, Default)]
pub struct UploadLifecycle {
    state: UploadState,
    generation: Generation,
}

impl UploadLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// 新しい試行を開始する
    ///
    /// 直前の結果・エラーを消し、進捗を 0 に戻す。送信中の試行があれば
    /// それは置き換えられ、以後そのコールバックは無視される。
    pub fn submit(&mut self) -> Generation {
        if matches!(self.state, UploadState::Uploading { .. }) {
            debug!(superseded = %self.generation, "Superseding in-flight upload");
        }
        self.generation = self.generation.next();
        self.state = UploadState::Uploading {
            progress_percent: 0,
        };
        debug!(generation = %self.generation, "Upload started");
        self.generation
    }

    /// 送信進捗を反映する
    ///
    /// `total` が 0 のイベントは無視する。進捗率は試行内で減少しない。
    pub fn on_progress(&mut self, generation: Generation, loaded: u64, total: u64) -> bool {
        if !self.accepts(generation, "progress") {
            return false;
        }
        let Some(percent) = percent_of(loaded, total) else {
            return false;
        };
        match &mut self.state {
            UploadState::Uploading { progress_percent } if percent > *progress_percent => {
                *progress_percent = percent;
                true
            }
            _ => false,
        }
    }

    /// サーバー応答を反映する
    ///
    /// 200 の場合はボディを JSON として解釈し、成功に遷移する。
    /// 解釈できなければ `InvalidResponse`、200 以外は `UploadFailed`。
    pub fn on_complete(&mut self, generation: Generation, status: u16, body: &str) -> bool {
        if !self.accepts(generation, "complete") {
            return false;
        }
        self.state = if status == 200 {
            match serde_json::from_str::<Value>(body) {
                Ok(payload) => UploadState::Succeeded { payload },
                Err(e) => UploadState::Failed {
                    failure: UploadFailure::InvalidResponse {
                        reason: e.to_string(),
                    },
                },
            }
        } else {
            UploadState::Failed {
                failure: UploadFailure::UploadFailed { status },
            }
        };
        debug!(generation = %generation, status, phase = %self.state.phase(), "Upload completed");
        true
    }

    /// 転送失敗を反映する
    pub fn on_transport_error(&mut self, generation: Generation, reason: impl Into<String>) -> bool {
        if !self.accepts(generation, "transport_error") {
            return false;
        }
        let reason = reason.into();
        debug!(generation = %generation, reason = %reason, "Upload transport failed");
        self.state = UploadState::Failed {
            failure: UploadFailure::Network { reason },
        };
        true
    }

    /// `Idle` に戻す
    ///
    /// 送信中の試行は取り消さない。その後届くコールバックは状態が
    /// `Uploading` でないため無視される。
    pub fn reset(&mut self) {
        self.state = UploadState::Idle;
    }

    /// 世代番号付きイベントを対応するコールバックに振り分ける
    pub fn apply(&mut self, tagged: TaggedEvent) -> bool {
        let TaggedEvent { generation, event } = tagged;
        match event {
            UploadEvent::Progress { loaded, total } => self.on_progress(generation, loaded, total),
            UploadEvent::Completed { status, body } => self.on_complete(generation, status, &body),
            UploadEvent::TransportFailed { reason } => self.on_transport_error(generation, reason),
        }
    }

    fn accepts(&self, generation: Generation, kind: &str) -> bool {
        if generation != self.generation {
            debug!(
                event = kind,
                stale = %generation,
                current = %self.generation,
                "Ignoring event from superseded upload"
            );
            return false;
        }
        if !matches!(self.state, UploadState::Uploading { .. }) {
            debug!(event = kind, phase = %self.state.phase(), "Ignoring event outside of upload");
            return false;
        }
        true
    }
}
