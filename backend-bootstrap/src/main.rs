use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use backend_bootstrap::telemetry::init_tracing;
use backend_bootstrap::{run_import, run_standalone, AppContext};
use backend_infrastructure::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "beyleague")]
#[command(about = "Beyblade league match records backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Import a match batch file and print the summary
    Import {
        file: PathBuf,
        /// Winner for rows whose winner cell names neither player: a, b or reject
        #[arg(long)]
        winner_policy: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var("BEYLEAGUE_CONFIG", config);
    }

    let config = AppConfig::load().await?;
    let _guard = init_tracing(config.log_dir.as_deref(), config.log_format == "json");
    let context = AppContext::new(&config)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => run_standalone(context).await,
        Command::Import {
            file,
            winner_policy,
        } => {
            let report = run_import(context, &file, winner_policy).await?;
            info!(fingerprint = %report.fingerprint, "import of {} done", file.display());
            println!("{}", report.summary());
            Ok(())
        }
    }
}
