/// プレゼンテーション層: アップロード進捗表示
///
/// `UploadState` の進捗率を表示する。
/// - 人間向け: stderr に indicatif のプログレスバー（長さ100 = 進捗率）
/// - 機械向け: 進捗が変わるたびに stdout へ JSON を1行
use crate::domain::lifecycle::{UploadPhase, UploadState};
use indicatif::{ProgressBar, ProgressStyle};

/// プログレスバーのテンプレート
const BAR_TEMPLATE: &str = "{spinner:.green} Uploading [{bar:30.cyan/blue}] {pos:>3}%";

/// 進捗表示の状態
///
/// 同じ進捗率を二度描画しない。
#[derive(Debug)]
pub struct ProgressRenderer {
    bar: Option<ProgressBar>,
    last_percent: Option<u8>,
}

impl ProgressRenderer {
    pub fn new(machine_output: bool) -> Self {
        let bar = (!machine_output).then(|| {
            let bar = ProgressBar::new(100);
            if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });
        Self {
            bar,
            last_percent: None,
        }
    }

    /// 送信中の状態を描画する（それ以外の状態は無視）
    pub fn render(&mut self, state: &UploadState) {
        if state.phase() != UploadPhase::Uploading {
            return;
        }
        let percent = state.progress_percent();
        if self.last_percent == Some(percent) {
            return;
        }
        self.last_percent = Some(percent);

        match &self.bar {
            Some(bar) => bar.set_position(u64::from(percent)),
            None => {
                let snapshot = state.snapshot();
                println!(
                    "{}",
                    serde_json::json!({
                        "event": "progress",
                        "phase": snapshot.phase,
                        "progress_percent": snapshot.progress_percent,
                    })
                );
            }
        }
    }

    /// 描画中のバーを閉じる
    ///
    /// 100% に届かずに終わった場合は位置をそのまま残す。
    pub fn finish(&mut self) {
        if let Some(bar) = &self.bar {
            match self.last_percent {
                Some(100) => bar.finish(),
                Some(_) => bar.abandon(),
                None => bar.finish_and_clear(),
            }
        }
    }
}
