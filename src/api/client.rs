/// HTTPクライアント
///
/// 変換サーバーへの multipart/form-data アップロードを担当する。
/// ボディは `chunk_size` ごとにストリーム送信し、チャンクが HTTP スタックに
/// 渡されるたびに進捗を報告する。
use crate::api::error::InfraError;
use crate::api::transport::{ProgressReporter, TransportResponse, UploadTransport};
use crate::config::APP_CONFIG;
use crate::domain::file::FileHandle;
use futures::stream;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::io;
use std::time::Duration;
use tracing::{debug, info};

/// multipart のファイルフィールド名
const FILE_FIELD: &str = "file";

/// APIクライアントの結果型
type ApiResult<T> = Result<T, InfraError>;

/// アップロードクライアント
#[derive(Debug, Clone)]
pub struct UploadClient {
    client: Client,
    endpoint: String,
    chunk_size: usize,
}

impl UploadClient {
    /// 新しいアップロードクライアントを作成
    ///
    /// 接続確立にのみタイムアウトを設定する。アップロード全体には制限を設けない。
    pub fn new(endpoint: impl Into<String>) -> ApiResult<Self> {
        let connect_timeout = Duration::from_secs(APP_CONFIG.api.connect_timeout_seconds);

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| InfraError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            chunk_size: APP_CONFIG.upload.chunk_size,
        })
    }

    /// 埋め込み設定のエンドポイントを使うクライアントを作成
    pub fn production() -> ApiResult<Self> {
        Self::new(APP_CONFIG.api.endpoint.clone())
    }

    /// チャンクサイズを変更する
    #[cfg(test)]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `file` フィールド1つだけのフォームを構築
    fn build_form(&self, file: FileHandle, progress: ProgressReporter) -> Form {
        let total = file.size();
        let file_name = file.name().to_string();
        let chunks = file.into_chunks(self.chunk_size);

        let mut loaded = 0u64;
        let body = stream::iter(chunks.into_iter().map(move |chunk| {
            loaded += chunk.len() as u64;
            progress.report(loaded, total);
            Ok::<_, io::Error>(chunk)
        }));

        let part = Part::stream_with_length(Body::wrap_stream(body), total).file_name(file_name);
        Form::new().part(FILE_FIELD, part)
    }

    /// 送信エラーを分類する
    fn classify_send_error(&self, e: reqwest::Error) -> InfraError {
        if e.is_timeout() {
            InfraError::timeout(format!("POST {}", self.endpoint))
        } else if e.is_connect() {
            InfraError::network(format!("Connection failed to {}: {}", self.endpoint, e))
        } else {
            InfraError::network(format!("Request failed for POST {}: {}", self.endpoint, e))
        }
    }

    #[cfg(test)]
    pub(crate) fn with_http_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            chunk_size: APP_CONFIG.upload.chunk_size,
        }
    }
}

impl UploadTransport for UploadClient {
    async fn upload(
        &self,
        file: FileHandle,
        progress: ProgressReporter,
    ) -> ApiResult<TransportResponse> {
        info!(
            endpoint = %self.endpoint,
            file = %file.name(),
            size = file.size(),
            "Uploading file"
        );

        let form = self.build_form(file, progress);
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status().as_u16();
        // 200 以外はボディを使わないので、読めなくても応答として扱う
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status != 200 => {
                debug!(status, error = %e, "Discarding unreadable error response body");
                String::new()
            }
            Err(e) => {
                return Err(InfraError::network(format!(
                    "Failed to read response body: {}",
                    e
                )));
            }
        };

        debug!(status, body_len = body.len(), "Upload response received");
        Ok(TransportResponse { status, body })
    }
}
