use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod figure;
mod preprocessing;
mod server;
mod storage;

#[derive(Parser, Debug)]
#[command(name = "fingerprint-skeleton-server")]
#[command(about = "Upload a fingerprint, get back its binarized and thinned skeleton")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "FINGERPRINT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "FINGERPRINT_PORT", default_value = "5000")]
    pub port: u16,

    /// Directory where raw uploads are stored
    #[arg(long, env = "FINGERPRINT_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Directory where rendered comparison figures are stored
    #[arg(long, env = "FINGERPRINT_PROCESSED_DIR", default_value = "processed")]
    pub processed_dir: PathBuf,

    /// Maximum upload size in bytes (default: 16MB)
    #[arg(long, env = "FINGERPRINT_MAX_FILE_SIZE", default_value = "16777216")]
    pub max_file_size: usize,

    /// TTF/OTF font used for panel titles (titles are omitted if not set)
    #[arg(long, env = "FINGERPRINT_FONT_PATH")]
    pub font_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from(args);

    tracing::info!(
        "Starting fingerprint-skeleton-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
