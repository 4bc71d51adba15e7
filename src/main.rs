use std::sync::Arc;

use anyhow::Context;

use neuromatch::cli::{App, stdin_lines};
use neuromatch::config::AppConfig;
use neuromatch::store::{LibSqlStore, RecordStore, Records};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().context("reading configuration")?;

    eprintln!("🧠 NeuroMatch v{}", env!("CARGO_PKG_VERSION"));

    // ── Database ─────────────────────────────────────────────────────────
    let store: Arc<dyn RecordStore> = Arc::new(
        LibSqlStore::new_local(&config.db_path)
            .await
            .with_context(|| format!("opening database at {}", config.db_path.display()))?,
    );
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!(
        "   Processing delay: {}ms, reply delay: {}-{}ms",
        config.processing_delay.as_millis(),
        config.reply_delay_min.as_millis(),
        config.reply_delay_max.as_millis()
    );
    eprintln!("   Type /help for commands, /quit to exit.\n");

    let records = Records::new(store);
    App::new(config, records).run(stdin_lines()).await
}
