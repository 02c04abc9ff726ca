/// 設定管理モジュール
///
/// このモジュールは2層の設定構造を提供します:
/// 1. AppConfig - ビルド時に埋め込まれる静的設定（APP_CONFIG）
/// 2. UserConfig - 実行時に読み込まれる表示まわりの設定
///
/// # 使用例
///
/// ```rust,ignore
/// use crate::config::{APP_CONFIG, UserConfig};
///
/// let endpoint = &APP_CONFIG.api.endpoint;
/// let user_config = UserConfig::load()?;
/// ```
pub mod app;
pub mod error;
pub mod user;

pub use app::{APP_CONFIG, BYTES_PER_MB};
pub use user::{DisplayMode, UserConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_direct_access() {
        assert!(!APP_CONFIG.api.endpoint.is_empty());
        assert!(APP_CONFIG.api.connect_timeout_seconds > 0);
        assert!(!APP_CONFIG.upload.advisory_formats.is_empty());
    }

    #[test]
    fn test_user_config_default_is_valid() {
        assert!(UserConfig::default().validate().is_ok());
    }
}
