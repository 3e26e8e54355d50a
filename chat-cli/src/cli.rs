//! CLI parser and config loading.

use std::env;

use clap::{Parser, Subcommand};
use message_store::StoreConfig;

#[derive(Parser)]
#[command(name = "chatdb")]
#[command(about = "Chat message store CLI: generate, query, count", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Generate synthetic messages and insert them in one transaction.
    Generate {
        #[arg(short, long, default_value = "1000")]
        rows: usize,
    },
    /// Fetch messages dated within [start, end] (epoch ms); a random last-month window when both are omitted.
    Query {
        #[arg(long)]
        start: Option<i64>,
        #[arg(long)]
        end: Option<i64>,
        /// How many of the fetched messages to print.
        #[arg(short, long, default_value = "5")]
        show: usize,
    },
    /// Print the number of stored messages.
    Count,
}

/// Store location plus the log file, from env.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub store: StoreConfig,
    pub log_file: String,
}

impl CliConfig {
    /// Reads `CHAT_DB_NAME`, `CHAT_STORE_NAME`, `CHAT_DATA_DIR` and `LOG_FILE`.
    pub fn load() -> Self {
        let store = StoreConfig::from_env();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| chat_core::DEFAULT_LOG_FILE.to_string());
        Self { store, log_file }
    }
}
