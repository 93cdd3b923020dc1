//! ログ初期化
//!
//! tracing + tracing-subscriber。RUST_LOG があればそれを優先する。
//! 例: RUST_LOG=kit_report=trace

use tracing_subscriber::{fmt, EnvFilter};

/// 既定は info、`--verbose` で debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // 進捗表示（stdout）と混ざらないよう stderr へ
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}

/// テスト用（debug レベル、テスト出力に流す）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
