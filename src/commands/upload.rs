use crate::api::client::UploadClient;
use crate::api::transport::UploadTransport;
use crate::commands::result::{CommandResult, UploadResult};
use crate::config::UserConfig;
use crate::domain::file::{FileHandle, advisory_warnings};
use crate::domain::lifecycle::UploadState;
use crate::presentation::output::select_payload;
use crate::presentation::progress::ProgressRenderer;
use crate::session::UploadSession;
use anyhow::{Context, Result};
use tracing::{debug, info};

/// アップロードコマンドを実行する
///
/// # 引数
/// * `file_path` - 変換対象ファイルのパス
/// * `show_progress` - 進捗を表示するか（ユーザー設定の `show_progress` とOR）
/// * `machine_output` - 機械可読出力モード
///
/// # エラー
/// このレイヤーでは anyhow::Result を返し、
/// ドメイン層・インフラ層のエラーを集約する。
pub async fn execute(
    file_path: &str,
    show_progress: bool,
    machine_output: bool,
) -> Result<CommandResult> {
    let user_config = UserConfig::load()
        .context("Failed to load user configuration. Please check your config.toml file.")?;

    let client = UploadClient::production().context("Failed to initialize HTTP client")?;
    info!(endpoint = %client.endpoint(), "Using conversion endpoint");

    upload_with(client, file_path, &user_config, show_progress, machine_output).await
}

/// 指定の転送手段でファイルをアップロードし、結果をコマンド結果に変換する
///
/// アップロードの失敗は `UploadFailure` として返る。
pub async fn upload_with<T: UploadTransport>(
    transport: T,
    file_path: &str,
    user_config: &UserConfig,
    show_progress: bool,
    machine_output: bool,
) -> Result<CommandResult> {
    let file = FileHandle::open(file_path).context("Failed to prepare file for upload")?;

    // 推奨サイズ・形式は警告のみ（アップロードは続行）
    for warning in advisory_warnings(&file) {
        debug!(file = %file.name(), "{}", warning);
        if !machine_output {
            eprintln!("Warning: {}", warning);
        }
    }

    let file_name = file.name().to_string();
    let file_size = file.size();

    if !machine_output {
        eprintln!("Uploading {} ({} bytes)...", file_name, file_size);
    }

    let mut session = UploadSession::new(transport);
    let mut renderer = ProgressRenderer::new(machine_output);
    let show_progress = show_progress || user_config.show_progress;

    session.submit(file);
    if show_progress {
        renderer.render(session.state());
    }

    session
        .run_to_completion(|state| {
            if show_progress {
                renderer.render(state);
            }
        })
        .await;
    renderer.finish();

    match session.take_outcome() {
        UploadState::Succeeded { payload } => Ok(CommandResult::Upload(UploadResult {
            file_name,
            file_size,
            result: select_payload(&payload, user_config.display_mode),
            json_indent: user_config.json_indent,
        })),
        UploadState::Failed { failure } => Err(anyhow::Error::new(failure)),
        other => anyhow::bail!("Upload ended in unexpected state: {}", other.phase()),
    }
}
