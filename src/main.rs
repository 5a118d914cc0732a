use clap::Parser;
use sharesync::{run_fetch, DownloadConfig, SHARE_URL_ENV};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber;

#[derive(Parser, Debug)]
#[command(name = "sharesync")]
#[command(about = "Fetch a shared cloud-storage file as a direct download", long_about = None)]
#[command(version)]
struct Args {
    /// Share link to fetch (usually supplied via the environment)
    #[arg(long, env = SHARE_URL_ENV)]
    share_url: Option<String>,

    /// Directory the artifact and change marker are written to
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Artifact filename within the data directory
    #[arg(short, long, default_value = "dataset.xlsx")]
    artifact: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("sharesync={}", log_level))
        .init();

    info!("🚀 ShareSync - shared file fetcher");
    info!("Data directory: {:?}", args.data_dir);
    info!("Artifact: {}", args.artifact);

    let config = DownloadConfig {
        share_url: args.share_url,
        data_dir: args.data_dir,
        artifact_name: args.artifact,
        ..Default::default()
    };

    match run_fetch(&config).await {
        Ok(true) => {
            info!("✅ Fetch completed successfully!");
            Ok(())
        }
        Ok(false) => {
            eprintln!("❌ Fetch did not complete successfully");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
