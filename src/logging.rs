/// ロギング初期化
///
/// `RUST_LOG` が設定されていればそれを、なければ埋め込み設定の
/// `logging.level` をフィルタとして stderr に出力する。
/// stdout は結果JSON用に空けておく。
use crate::config::APP_CONFIG;
use tracing_subscriber::EnvFilter;

pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&APP_CONFIG.logging.level));

    // 二重初期化（テストなど）は無視する
    let _ = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
