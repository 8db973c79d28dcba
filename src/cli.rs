use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "crypto-recommend")]
#[command(about = "Crypto price statistics and recommendations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server and rescan the data directory periodically
    Serve {
        /// Port to listen on (default: $PORT or 8080)
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory with <SYMBOL>_values.csv files (default: $CRYPTO_DATA_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Scan the data directory once and show what was loaded
    Scan {
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Show statistics for one crypto, or all cryptos ranked by normalized range
    Stats {
        /// Crypto symbol (e.g. BTC); omit to rank all cryptos
        symbol: Option<String>,
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Show the crypto with the highest normalized range on a day
    Best {
        /// Day to analyze (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

pub async fn run() {
    let cli = Cli::parse();
    crate::utils::init_tracing();

    match cli.command {
        Commands::Serve { port, dir } => {
            commands::serve::run(port, dir).await;
        }
        Commands::Scan { dir } => {
            commands::query::scan(dir).await;
        }
        Commands::Stats { symbol, dir } => {
            commands::query::stats(symbol, dir).await;
        }
        Commands::Best { date, dir } => {
            commands::query::best(date, dir).await;
        }
    }
}
