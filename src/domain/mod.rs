/// ドメイン層
///
/// - `lifecycle`: アップロードの状態機械
/// - `event`: 転送タスクから届くイベント
/// - `file`: アップロード対象ファイルと注意書き
/// - `error`: ドメインエラーと失敗理由
pub mod error;
pub mod event;
pub mod file;
pub mod lifecycle;
