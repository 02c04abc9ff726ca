/// コマンド実行結果を表す型
///
/// 各コマンドはこの型を返し、プレゼンテーション層で
/// 人間向けと機械向けの出力フォーマットを決定する。
use crate::config::DisplayMode;
use serde::Serialize;
use serde_json::Value;

/// コマンド実行結果の統一型
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Upload(UploadResult),
    Config(ConfigResult),
    Help,
}

/// アップロードコマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    /// ファイル名
    pub file_name: String,
    /// ファイルサイズ（bytes）
    pub file_size: u64,
    /// 表示方法に従って選んだ結果JSON
    pub result: Value,
    /// 人間向け出力のインデント幅
    #[serde(skip)]
    pub json_indent: usize,
}

/// 設定表示コマンドの結果
#[derive(Debug, Clone, Serialize)]
pub struct ConfigResult {
    pub endpoint: String,
    pub connect_timeout_seconds: u64,
    pub chunk_size: usize,
    pub advisory_max_file_size: u64,
    pub advisory_formats: Vec<String>,
    pub user_config_path: String,
    pub display_mode: DisplayMode,
    pub show_progress: bool,
    pub json_indent: usize,
}

impl CommandResult {
    /// 成功メッセージを取得（人間向け出力用）
    pub fn success_message(&self) -> String {
        match self {
            CommandResult::Upload(r) => format!("Converted {} successfully!", r.file_name),
            CommandResult::Config(_) => "Current configuration".to_string(),
            CommandResult::Help => "".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_result_serialization() {
        let result = CommandResult::Upload(UploadResult {
            file_name: "a.pdf".to_string(),
            file_size: 42,
            result: json!({"name": "x"}),
            json_indent: 2,
        });

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["command"], "upload");
        assert_eq!(value["file_name"], "a.pdf");
        assert_eq!(value["file_size"], 42);
        assert_eq!(value["result"], json!({"name": "x"}));
        assert!(value.get("json_indent").is_none());
    }

    #[test]
    fn test_help_serialization() {
        let value = serde_json::to_value(CommandResult::Help).unwrap();
        assert_eq!(value, json!({"command": "help"}));
    }
}
