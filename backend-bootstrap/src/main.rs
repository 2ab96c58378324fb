use anyhow::Result;
use clap::Parser;

use backend_bootstrap::logging::{init_tracing, startup_subscriber};
use backend_infrastructure::{AppConfig, CONFIG_PATH_ENV};

#[derive(Parser, Debug)]
#[command(name = "doorguard-backend")]
#[command(about = "Doorstep-banking risk alert service", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Run one scan, print the result as JSON and exit
    #[arg(long)]
    scan_once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var(CONFIG_PATH_ENV, config);
    }

    let config = {
        let _startup = tracing::subscriber::set_default(startup_subscriber(std::io::stderr));
        AppConfig::load().await?
    };
    let _log_guard = init_tracing(config.log_dir.as_deref());

    if args.scan_once {
        backend_bootstrap::run_scan_once(&config).await
    } else {
        backend_bootstrap::run_standalone(&config).await
    }
}
