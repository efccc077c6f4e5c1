//! LedgerLens launcher
//!
//! Single subcommand: `serve`, which runs the receipt draft extraction
//! endpoint. The inference credential (`ANTHROPIC_API_KEY`) is read per
//! request by the handler, so the server starts fine without it and
//! reports a configuration error on use instead of crashing.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ledgerlens::server::{self, AppState};
use ledgerlens::telemetry;
use ledgerlens_extract::{ExtractOptions, DEFAULT_AMOUNT_CEILING};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "ledgerlens", about = "Receipt draft extraction service")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP extraction service
    Serve {
        /// Address to listen on
        #[arg(long, env = "LEDGERLENS_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Model identifier for the vision provider
        #[arg(long, env = "LEDGERLENS_MODEL", default_value = ledgerlens_vision::DEFAULT_MODEL)]
        model: String,

        /// Inclusive upper bound for extracted amounts, in whole currency units
        #[arg(long, env = "LEDGERLENS_AMOUNT_CEILING", default_value_t = DEFAULT_AMOUNT_CEILING)]
        amount_ceiling: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match cli.command {
        Commands::Serve {
            bind,
            model,
            amount_ceiling,
        } => {
            let options = ExtractOptions {
                model,
                amount_ceiling,
                ..Default::default()
            };
            server::run(bind, AppState::from_env(options)).await
        }
    }
}
