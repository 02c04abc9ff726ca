/// アップロードセッション
///
/// `UploadLifecycle` を所有し、試行ごとに転送タスクを1つ起動する。
/// 転送タスクは進捗・完了・転送失敗を世代番号付きイベントとしてチャネルに送り、
/// セッションはそれを1か所（`next_event`）で受け取って状態に反映する。
///
/// 実行中の試行は取り消さない。新しい `submit` の後に届いた古い試行の
/// イベントは世代番号の不一致で捨てられる。
use crate::api::transport::{ProgressReporter, UploadTransport};
use crate::domain::event::{TaggedEvent, UploadEvent};
use crate::domain::file::FileHandle;
use crate::domain::lifecycle::{Generation, UploadLifecycle, UploadPhase, UploadState};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

pub struct UploadSession<T> {
    transport: Arc<T>,
    lifecycle: UploadLifecycle,
    tx: UnboundedSender<TaggedEvent>,
    rx: UnboundedReceiver<TaggedEvent>,
}

impl<T: UploadTransport> UploadSession<T> {
    pub fn new(transport: T) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            transport: Arc::new(transport),
            lifecycle: UploadLifecycle::new(),
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &UploadState {
        self.lifecycle.state()
    }

    /// ファイルの送信を開始する
    ///
    /// tokio ランタイム上で呼び出すこと。状態は即座に `Uploading`（0%）になる。
    pub fn submit(&mut self, file: FileHandle) -> Generation {
        let generation = self.lifecycle.submit();
        info!(
            generation = %generation,
            file = %file.name(),
            size = file.size(),
            "Submitting upload"
        );

        let transport = Arc::clone(&self.transport);
        let progress = ProgressReporter::new(generation, self.tx.clone());
        let tx = self.tx.clone();

        let upload = tokio::spawn(async move { transport.upload(file, progress).await });

        // 転送タスクがパニックしても必ず終了イベントを送る
        tokio::spawn(async move {
            let event = match upload.await {
                Ok(Ok(response)) => UploadEvent::Completed {
                    status: response.status,
                    body: response.body,
                },
                Ok(Err(e)) => {
                    debug!(generation = %generation, error = %e, "Upload transport failed");
                    UploadEvent::TransportFailed {
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    debug!(generation = %generation, error = %e, "Upload task aborted");
                    UploadEvent::TransportFailed {
                        reason: format!("upload task aborted: {}", e),
                    }
                }
            };
            // セッションが先に破棄されていれば結果は捨てる
            let _ = tx.send(TaggedEvent::new(generation, event));
        });

        generation
    }

    /// 次のイベントを1つ受け取って反映する
    ///
    /// 状態が変わった場合に `true`。古い試行のイベントは `false`。
    pub async fn next_event(&mut self) -> bool {
        // 送信側をセッション自身が保持しているので None にはならない
        match self.rx.recv().await {
            Some(tagged) => self.lifecycle.apply(tagged),
            None => false,
        }
    }

    /// 現在の試行が終わるまでイベントを処理する
    ///
    /// 状態が変わるたびに `on_change` を呼ぶ。`Uploading` でなければ即座に返る。
    pub async fn run_to_completion<F>(&mut self, mut on_change: F) -> &UploadState
    where
        F: FnMut(&UploadState),
    {
        while self.lifecycle.state().phase() == UploadPhase::Uploading {
            if self.next_event().await {
                on_change(self.lifecycle.state());
            }
        }
        self.lifecycle.state()
    }

    /// 終わった試行の状態を取り出し、`Idle` に戻す
    pub fn take_outcome(&mut self) -> UploadState {
        let outcome = self.lifecycle.state().clone();
        self.reset();
        outcome
    }

    /// `Idle` に戻す（実行中の転送は取り消さない）
    pub fn reset(&mut self) {
        self.lifecycle.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::InfraError;
    use crate::api::transport::TransportResponse;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    const MB: u64 = 1024 * 1024;

    /// 台本どおりに進捗と結果を返す転送手段
    enum Script {
        Respond {
            progress: Vec<(u64, u64)>,
            status: u16,
            body: String,
        },
        Unreachable,
    }

    struct ScriptedTransport {
        script: Script,
    }

    impl UploadTransport for ScriptedTransport {
        async fn upload(
            &self,
            _file: FileHandle,
            progress: ProgressReporter,
        ) -> Result<TransportResponse, InfraError> {
            match &self.script {
                Script::Respond {
                    progress: ticks,
                    status,
                    body,
                } => {
                    for (loaded, total) in ticks {
                        progress.report(*loaded, *total);
                    }
                    Ok(TransportResponse {
                        status: *status,
                        body: body.clone(),
                    })
                }
                Script::Unreachable => Err(InfraError::network("connection refused")),
            }
        }
    }

    /// ファイル名ごとにゲートで応答を止められる転送手段
    ///
    /// 応答ボディは `{"file": <name>}`。
    #[derive(Default)]
    struct GatedTransport {
        gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    }

    impl GatedTransport {
        fn gate(self, name: &str, gate: oneshot::Receiver<()>) -> Self {
            self.gates.lock().unwrap().insert(name.to_string(), gate);
            self
        }
    }

    impl UploadTransport for GatedTransport {
        async fn upload(
            &self,
            file: FileHandle,
            progress: ProgressReporter,
        ) -> Result<TransportResponse, InfraError> {
            let gate = self.gates.lock().unwrap().remove(file.name());
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            progress.report(file.size(), file.size());
            Ok(TransportResponse {
                status: 200,
                body: json!({ "file": file.name() }).to_string(),
            })
        }
    }

    /// 送信中にパニックする転送手段
    struct PanickingTransport;

    impl UploadTransport for PanickingTransport {
        async fn upload(
            &self,
            _file: FileHandle,
            _progress: ProgressReporter,
        ) -> Result<TransportResponse, InfraError> {
            panic!("transport exploded")
        }
    }

    #[tokio::test]
    async fn test_submit_enters_uploading_immediately() {
        let mut session = UploadSession::new(ScriptedTransport {
            script: Script::Unreachable,
        });
        session.submit(FileHandle::new("a.pdf", vec![0u8; 8]));

        assert_eq!(session.state().phase(), UploadPhase::Uploading);
        assert_eq!(session.state().progress_percent(), 0);
    }

    #[tokio::test]
    async fn test_progress_sequence_and_success() {
        let mut session = UploadSession::new(ScriptedTransport {
            script: Script::Respond {
                progress: vec![(MB, 2 * MB), (2 * MB, 2 * MB)],
                status: 200,
                body: r#"{"name":"x"}"#.to_string(),
            },
        });
        session.submit(FileHandle::new("scan.pdf", vec![0u8; 16]));

        let mut percents = Vec::new();
        let state = session
            .run_to_completion(|state| {
                if state.phase() == UploadPhase::Uploading {
                    percents.push(state.progress_percent());
                }
            })
            .await;

        assert_eq!(state.phase(), UploadPhase::Succeeded);
        assert_eq!(state.result_payload(), Some(&json!({"name": "x"})));
        assert_eq!(percents, vec![50, 100]);
    }

    #[tokio::test]
    async fn test_server_error_fails_with_generic_message() {
        let mut session = UploadSession::new(ScriptedTransport {
            script: Script::Respond {
                progress: vec![],
                status: 500,
                body: String::new(),
            },
        });
        session.submit(FileHandle::new("scan.pdf", vec![1]));

        let state = session.run_to_completion(|_| {}).await;
        assert_eq!(state.phase(), UploadPhase::Failed);
        assert_eq!(state.error_message(), "Upload failed");
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_with_network_message() {
        let mut session = UploadSession::new(ScriptedTransport {
            script: Script::Unreachable,
        });
        session.submit(FileHandle::new("scan.pdf", vec![1]));

        let state = session.run_to_completion(|_| {}).await;
        assert_eq!(state.phase(), UploadPhase::Failed);
        assert_eq!(state.error_message(), "Network error");
    }

    #[tokio::test]
    async fn test_superseded_attempt_does_not_affect_state() {
        let (release_a, gate_a) = oneshot::channel();
        let transport = GatedTransport::default().gate("a.pdf", gate_a);
        let mut session = UploadSession::new(transport);

        let first = session.submit(FileHandle::new("a.pdf", vec![0u8; 4]));
        let second = session.submit(FileHandle::new("b.pdf", vec![0u8; 2]));
        assert!(second > first);

        let state = session.run_to_completion(|_| {}).await;
        assert_eq!(state.result_payload(), Some(&json!({"file": "b.pdf"})));

        // 古い試行の進捗と完了がここで届くが、どちらも反映されない
        release_a.send(()).unwrap();
        assert!(!session.next_event().await);
        assert!(!session.next_event().await);

        assert_eq!(session.state().phase(), UploadPhase::Succeeded);
        assert_eq!(
            session.state().result_payload(),
            Some(&json!({"file": "b.pdf"}))
        );
    }

    #[tokio::test]
    async fn test_reset_then_resubmit() {
        let mut session = UploadSession::new(ScriptedTransport {
            script: Script::Respond {
                progress: vec![(1, 1)],
                status: 200,
                body: "{}".to_string(),
            },
        });
        session.submit(FileHandle::new("a.pdf", vec![1]));
        session.run_to_completion(|_| {}).await;

        session.reset();
        assert_eq!(session.state(), &UploadState::Idle);

        // Idle では待たずに返る
        let state = session.run_to_completion(|_| {}).await;
        assert_eq!(state.phase(), UploadPhase::Idle);

        session.submit(FileHandle::new("b.pdf", vec![1]));
        let state = session.run_to_completion(|_| {}).await;
        assert_eq!(state.phase(), UploadPhase::Succeeded);
    }

    #[tokio::test]
    async fn test_panicking_transport_ends_attempt_as_network_failure() {
        let mut session = UploadSession::new(PanickingTransport);
        session.submit(FileHandle::new("a.pdf", vec![1]));

        let state = session.run_to_completion(|_| {}).await;
        assert_eq!(state.phase(), UploadPhase::Failed);
        assert_eq!(state.error_message(), "Network error");
    }

    #[tokio::test]
    async fn test_take_outcome_returns_terminal_state_and_resets() {
        let mut session = UploadSession::new(ScriptedTransport {
            script: Script::Respond {
                progress: vec![],
                status: 200,
                body: r#"{"name":"x"}"#.to_string(),
            },
        });
        session.submit(FileHandle::new("a.pdf", vec![1]));
        session.run_to_completion(|_| {}).await;

        let outcome = session.take_outcome();
        assert_eq!(outcome.result_payload(), Some(&json!({"name": "x"})));
        assert_eq!(session.state(), &UploadState::Idle);
    }
}
