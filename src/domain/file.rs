/// ドメインサービス: アップロード対象ファイル
///
/// ファイルを読み込んでアップロード可能な形にする。
/// サイズや形式の制限はアップロードを止めない。`advisory_warnings` が
/// 注意書きを返すだけで、表示するかどうかは呼び出し側が決める。
use crate::config::APP_CONFIG;
use crate::domain::error::DomainError;
use std::fs;
use std::path::Path;

/// アップロードするファイル（名前と中身）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: String,
    bytes: Vec<u8>,
}

impl FileHandle {
    /// メモリ上のデータからファイルを作る
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// パスからファイルを読み込む
    ///
    /// # エラー
    /// - ファイルが存在しない
    /// - ディレクトリが指定された
    /// - 読み込みに失敗した
    pub fn open(file_path: &str) -> Result<Self, DomainError> {
        let path = Path::new(file_path);

        if !path.exists() {
            return Err(DomainError::file_not_found(file_path));
        }

        let metadata =
            fs::metadata(path).map_err(|e| DomainError::unreadable(file_path, e))?;
        if metadata.is_dir() {
            return Err(DomainError::not_a_file(file_path));
        }

        let bytes = fs::read(path).map_err(|e| DomainError::unreadable(file_path, e))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file_path)
            .to_string();

        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// 小文字化した拡張子
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
    }

    /// 中身を `chunk_size` バイトごとに分割して取り出す
    pub fn into_chunks(self, chunk_size: usize) -> Vec<Vec<u8>> {
        self.bytes
            .chunks(chunk_size.max(1))
            .map(<[u8]>::to_vec)
            .collect()
    }
}

/// アップロードを止めない注意書きを返す
///
/// 推奨サイズ・推奨形式は `APP_CONFIG.upload` から取得する。
pub fn advisory_warnings(file: &FileHandle) -> Vec<String> {
    let upload = &APP_CONFIG.upload;
    let mut warnings = Vec::new();

    if file.size() > upload.advisory_max_file_size {
        warnings.push(format!(
            "{} is {:.2} MB; the converter is intended for files up to {} MB",
            file.name(),
            file.size() as f64 / 1024.0 / 1024.0,
            upload.advisory_max_file_size / 1024 / 1024
        ));
    }

    match file.extension() {
        Some(ext) if upload.advisory_formats.iter().any(|f| f == &ext) => {}
        Some(ext) => warnings.push(format!(
            "'.{}' files may not be supported (expected one of: {})",
            ext,
            upload.advisory_formats.join(", ")
        )),
        None => warnings.push(format!(
            "{} has no extension (expected one of: {})",
            file.name(),
            upload.advisory_formats.join(", ")
        )),
    }

    warnings
}
