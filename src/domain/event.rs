/// ドメイン層: アップロード試行から届くイベント
///
/// 転送タスクは進捗・完了・転送失敗をこのイベントとして送り、
/// `UploadLifecycle` が唯一の受け手として状態に反映する。
use crate::domain::lifecycle::Generation;
use serde::Serialize;

/// 1回のアップロード試行が発生させるイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UploadEvent {
    /// リクエストボディの送信進捗
    Progress { loaded: u64, total: u64 },

    /// サーバーから応答が返った（ステータスを問わない）
    Completed { status: u16, body: String },

    /// サーバーに到達できなかった
    TransportFailed { reason: String },
}

/// 世代番号付きのイベント
///
/// 古い試行のイベントを識別するために、送信元の世代を添えてチャネルに流す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEvent {
    pub generation: Generation,
    pub event: UploadEvent,
}

impl TaggedEvent {
    pub fn new(generation: Generation, event: UploadEvent) -> Self {
        Self { generation, event }
    }
}
