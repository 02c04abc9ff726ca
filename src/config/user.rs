/// ユーザー設定モジュール
///
/// 実行時にユーザーディレクトリから読み込まれる動的設定を管理します。
/// Windows: C:\Users\<User>\AppData\Roaming\filejson\config.toml
/// macOS:   /Users/<User>/Library/Application Support/filejson/config.toml
/// Linux:   /home/<user>/.config/filejson/config.toml
///
/// 初回起動時にデフォルト値から自動的にconfig.tomlを作成します。
use crate::config::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// デフォルトのJSONインデント幅
const DEFAULT_JSON_INDENT: usize = 2;

/// JSONインデント幅の最大値
const MAX_JSON_INDENT: usize = 8;

/// 結果JSONの表示方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// サーバー応答をそのまま表示
    #[default]
    Raw,
    /// `{ "data": <response.data> }` だけを表示（他のフィールドは落ちる）
    Data,
}

/// ユーザー設定
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    /// 結果JSONの表示方法
    #[serde(default)]
    pub display_mode: DisplayMode,

    /// `--progress` を指定しなくても進捗を表示するか
    #[serde(default)]
    pub show_progress: bool,

    /// 結果JSONのインデント幅（1〜8）
    #[serde(default = "default_json_indent")]
    pub json_indent: usize,
}

// プライベート関数（serde用）
fn default_json_indent() -> usize {
    DEFAULT_JSON_INDENT
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::default(),
            show_progress: false,
            json_indent: DEFAULT_JSON_INDENT,
        }
    }
}

impl UserConfig {
    /// ユーザー設定ファイルのパスを取得
    ///
    /// # Errors
    /// 設定ディレクトリが取得できない場合に ConfigError::DirectoryNotFound を返します。
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .ok_or_else(|| ConfigError::directory_not_found("Failed to get user config directory"))
            .map(|config_dir| config_dir.join("filejson").join("config.toml"))
    }

    /// ユーザー設定を読み込む
    ///
    /// 設定ファイルが存在しない場合は、デフォルトテンプレートから自動的に作成します。
    /// 読み込み後、自動的に検証を実行します（Fail Fast）。
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスからユーザー設定を読み込む
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to read config file: {}", config_path.display()),
                e,
            )
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::parse_error(
                format!("Failed to parse config file ({})", config_path.display()),
                e,
            )
        })?;

        config.validate()?;

        Ok(config)
    }

    /// デフォルト設定ファイルを作成
    fn create_default_config(config_path: &Path) -> Result<(), ConfigError> {
        Self::ensure_parent_dir(config_path)?;

        fs::write(config_path, Self::default_toml_content()).map_err(|e| {
            ConfigError::file_system(
                format!("Failed to create default config file: {}", config_path.display()),
                e,
            )
        })?;

        Ok(())
    }

    /// デフォルトTOML設定を生成
    fn default_toml_content() -> String {
        format!(
            r#"# filejson - User Configuration

# How the extracted JSON is printed
#   "raw"  - the full server response (default)
#   "data" - only {{ "data": <response.data> }}
display_mode = "raw"

# Show upload progress even without --progress
show_progress = false

# Indentation width of the printed JSON (1-{})
json_indent = {}
"#,
            MAX_JSON_INDENT, DEFAULT_JSON_INDENT
        )
    }

    fn ensure_parent_dir(config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::file_system(
                    format!("Failed to create config directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// ユーザー設定を検証
    ///
    /// # 検証内容
    /// - json_indent: 1〜8 の範囲であること
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.json_indent == 0 || self.json_indent > MAX_JSON_INDENT {
            return Err(ConfigError::validation_error(format!(
                "Invalid json_indent '{}'. Must be between 1 and {}",
                self.json_indent, MAX_JSON_INDENT
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = UserConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.display_mode, DisplayMode::Raw);
        assert!(!config.show_progress);
        assert_eq!(config.json_indent, DEFAULT_JSON_INDENT);
    }

    #[test]
    fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "display_mode = \"data\"\nshow_progress = true\njson_indent = 4\n",
        )
        .unwrap();

        let config = UserConfig::load_from(&path).unwrap();
        assert_eq!(config.display_mode, DisplayMode::Data);
        assert!(config.show_progress);
        assert_eq!(config.json_indent, 4);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "show_progress = true\n").unwrap();

        let config = UserConfig::load_from(&path).unwrap();
        assert!(config.show_progress);
        assert_eq!(config.display_mode, DisplayMode::Raw);
        assert_eq!(config.json_indent, DEFAULT_JSON_INDENT);
    }

    #[test]
    fn test_invalid_display_mode_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "display_mode = \"fancy\"\n").unwrap();

        let result = UserConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_invalid_indent_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "json_indent = 0\n").unwrap();

        let result = UserConfig::load_from(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));

        let config = UserConfig {
            json_indent: MAX_JSON_INDENT + 1,
            ..UserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_template_parses() {
        let config: UserConfig = toml::from_str(&UserConfig::default_toml_content()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.display_mode, DisplayMode::Raw);
    }
}
