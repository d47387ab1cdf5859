// src/main.rs
mod api;
mod cli;
mod config;
mod error;
mod geometry;
mod logging;
mod manifest;
mod metrics;
mod model;
mod optimizer;
mod orientation;
mod shelf;
mod types;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "shelf_pack")]
#[command(about = "Shelf-based 3D packing of boxes into a single container")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default)
    Serve,

    /// Pack an input document and write the result
    Pack {
        /// Log every packing decision
        #[arg(long)]
        debug: bool,

        /// Input document (JSON)
        input: PathBuf,

        /// Output document (JSON)
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv_result = dotenvy::dotenv();

    let debug = matches!(cli.command, Some(Commands::Pack { debug: true, .. }));
    logging::init(if debug {
        LevelFilter::Debug
    } else {
        config::log_level_from_env()
    });
    log::debug!("Debug mode activated");

    if let Err(err) = dotenv_result {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            log::warn!("Could not load .env: {}", err);
        }
    }

    let app_config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            log::info!("🚀 Packing service starting...");
            api::start_api_server(app_config.api, app_config.optimizer).await?;
        }
        Commands::Pack {
            debug,
            input,
            output,
        } => {
            let packing_config = app_config.optimizer.packing_config();
            let response = cli::run_pack_file(&input, &output, packing_config, debug)?;
            log::info!(
                "Packing complete: {} placed, {} unpacked, {:.2}% utilization. Output saved to: {}",
                response.metrics.items_packed,
                response.metrics.items_unpacked,
                response.metrics.utilization_percent,
                output.display()
            );
        }
    }

    Ok(())
}
