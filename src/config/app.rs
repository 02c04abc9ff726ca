/// アプリケーション設定モジュール
///
/// ビルド時に config.toml から読み込まれる静的設定を管理します。
/// これらの設定は実行時には変更できません（エンドポイントも固定）。
use serde::Deserialize;
use std::sync::LazyLock;

/// 1 MB のバイト数
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// 埋め込み設定のグローバルインスタンス
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(AppConfig::load);

/// アプリケーション全体の設定
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

/// API関連の設定
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 変換サービスのアップロードURL
    pub endpoint: String,

    /// 接続確立のタイムアウト(秒)
    ///
    /// アップロード全体には時間制限を設けない。
    pub connect_timeout_seconds: u64,
}

/// アップロード関連の設定
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// 送信ボディのチャンクサイズ (バイト)
    pub chunk_size: usize,

    /// 推奨最大ファイルサイズ (バイト、超えても警告のみ)
    pub advisory_max_file_size: u64,

    /// 推奨ファイル形式（拡張子、小文字）
    pub advisory_formats: Vec<String>,
}

/// ロギング関連の設定
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// RUST_LOG 未設定時のフィルタ (trace, debug, info, warn, error)
    pub level: String,
}

impl AppConfig {
    /// ビルド時に埋め込まれたconfig.tomlから設定を読み込む
    ///
    /// # Panics
    /// 設定ファイルのパースに失敗した場合はパニックします。
    /// これはビルド時設定なので、実行時エラーではなくビルドの誤りとして扱います。
    pub fn load() -> Self {
        const CONFIG_STR: &str = include_str!("../../config.toml");
        toml::from_str(CONFIG_STR)
            .expect("Failed to parse embedded config.toml. This is a build-time configuration error.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        let config = AppConfig::load();
        assert!(config.api.endpoint.starts_with("https://"));
        assert!(config.api.endpoint.ends_with("/api/upload"));
        assert!(config.upload.chunk_size > 0);
        assert_eq!(config.upload.advisory_max_file_size, 10 * BYTES_PER_MB);
    }

    #[test]
    fn test_advisory_formats_are_lowercase() {
        let config = AppConfig::load();
        assert!(config.upload.advisory_formats.contains(&"pdf".to_string()));
        assert!(config
            .upload
            .advisory_formats
            .iter()
            .all(|f| f.chars().all(|c| !c.is_ascii_uppercase())));
    }
}
