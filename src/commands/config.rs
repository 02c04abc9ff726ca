/// 設定表示コマンド
///
/// 埋め込み設定とユーザー設定を合わせた、実際に使われる設定を返します。
use crate::commands::result::{CommandResult, ConfigResult};
use crate::config::{APP_CONFIG, UserConfig};
use anyhow::{Context, Result};

/// 設定表示コマンドを実行
pub async fn execute() -> Result<CommandResult> {
    let config_path = UserConfig::config_path().context("Failed to locate user configuration")?;
    let user_config = UserConfig::load_from(&config_path)
        .context("Failed to load user configuration. Please check your config.toml file.")?;

    Ok(CommandResult::Config(ConfigResult {
        endpoint: APP_CONFIG.api.endpoint.clone(),
        connect_timeout_seconds: APP_CONFIG.api.connect_timeout_seconds,
        chunk_size: APP_CONFIG.upload.chunk_size,
        advisory_max_file_size: APP_CONFIG.upload.advisory_max_file_size,
        advisory_formats: APP_CONFIG.upload.advisory_formats.clone(),
        user_config_path: config_path.display().to_string(),
        display_mode: user_config.display_mode,
        show_progress: user_config.show_progress,
        json_indent: user_config.json_indent,
    }))
}
