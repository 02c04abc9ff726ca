/// アップロード転送の抽象
///
/// `UploadSession` は具体的な HTTP クライアントではなくこのトレイトに依存する。
/// 本番では `UploadClient`、テストでは台本どおりに振る舞う偽物が実装する。
use crate::api::error::InfraError;
use crate::domain::event::{TaggedEvent, UploadEvent};
use crate::domain::file::FileHandle;
use crate::domain::lifecycle::Generation;
use std::future::Future;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// サーバーからの応答（ステータスを問わない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// 送信進捗の報告口
///
/// 試行の世代番号を持ち、進捗イベントをセッションのチャネルに流す。
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    generation: Generation,
    tx: UnboundedSender<TaggedEvent>,
}

impl ProgressReporter {
    pub fn new(generation: Generation, tx: UnboundedSender<TaggedEvent>) -> Self {
        Self { generation, tx }
    }

    /// `loaded` / `total` バイトまで送信したことを報告する
    pub fn report(&self, loaded: u64, total: u64) {
        let event = TaggedEvent::new(self.generation, UploadEvent::Progress { loaded, total });
        if self.tx.send(event).is_err() {
            trace!(generation = %self.generation, "Progress receiver dropped");
        }
    }
}

/// 1ファイルを送信し、応答を返す転送手段
pub trait UploadTransport: Send + Sync + 'static {
    /// ファイルを送信する
    ///
    /// 送信中は `progress` に進捗を報告する。HTTP 応答が得られれば
    /// ステータスに関わらず `Ok`、到達できなければ `Err`。
    fn upload(
        &self,
        file: FileHandle,
        progress: ProgressReporter,
    ) -> impl Future<Output = Result<TransportResponse, InfraError>> + Send;
}
