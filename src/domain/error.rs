/// ドメイン層のエラー定義
///
/// - `DomainError`: アップロード対象ファイルを用意する段階の失敗
/// - `UploadFailure`: 1回のアップロード試行が失敗で終わった理由
///
/// `UploadFailure` の表示文字列はそのままユーザー向けメッセージになるため、
/// サーバーの応答内容を含めない固定文言にしている。
use crate::error_severity::ErrorSeverity;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// ファイルが見つからない
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// ディレクトリが指定された（ファイルが期待される場所）
    #[error("'{path}' is a directory, not a file")]
    NotAFile { path: String },

    /// ファイルは存在するが読み込めない
    #[error("failed to read file: {path}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl DomainError {
    /// ファイルが見つからないエラーを生成
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// ディレクトリ指定エラーを生成
    pub fn not_a_file(path: impl Into<String>) -> Self {
        Self::NotAFile { path: path.into() }
    }

    /// 読み込み失敗エラーを生成
    pub fn unreadable(path: impl Into<String>, source: io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::FileNotFound { .. } => ErrorSeverity::UserError,
            Self::NotAFile { .. } => ErrorSeverity::UserError,
            Self::Unreadable { .. } => ErrorSeverity::SystemError,
        }
    }

    /// ユーザー向けのヒントメッセージを返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::FileNotFound { .. } => {
                Some("Please check the file path and ensure the file exists.")
            }
            Self::NotAFile { .. } => Some("Please specify a file, not a directory."),
            Self::Unreadable { .. } => Some("Check that the file is readable by the current user."),
        }
    }
}

/// アップロード試行の失敗理由
///
/// 4xx と 5xx は区別しない。ステータスコードはログ用に保持するだけ。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// サーバーが 200 以外を返した（応答ボディは破棄）
    #[error("Upload failed")]
    UploadFailed { status: u16 },

    /// サーバーに到達できなかった
    #[error("Network error")]
    Network { reason: String },

    /// 200 だがボディが JSON として解釈できなかった
    #[error("Invalid response from server")]
    InvalidResponse { reason: String },
}

impl UploadFailure {
    /// エラーの深刻度を返す
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::SystemError
    }

    /// ユーザー向けのヒントメッセージを返す
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::UploadFailed { .. } => {
                Some("The server rejected the file. Try again or upload a different file.")
            }
            Self::Network { .. } => {
                Some("Check your internet connection and try again.")
            }
            Self::InvalidResponse { .. } => {
                Some("The server answered with something other than JSON. Try again later.")
            }
        }
    }
}
