//! Tracing setup for the chatdb binaries.
//!
//! Store events (`Inserted rows`, `Request completed in N ms`, schema upgrades)
//! go to the terminal and to an append-only log file through the same fmt layer,
//! so both sinks carry the structured fields (`store`, `count`, `elapsed_ms`).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::FmtSpan, fmt::writer::MakeWriterExt, layer::SubscriberExt,
    util::SubscriberInitExt, EnvFilter, Registry,
};

/// Log file used when `LOG_FILE` is unset, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "logs/chatdb.log";

/// Opens `path` for appending, creating the `logs/` directory (or whichever parent) first.
fn open_log_file(path: &str) -> io::Result<File> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)?,
        _ => {}
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber for a chatdb process.
///
/// `log_file_path` is normally `CliConfig::log_file` (`LOG_FILE`, default
/// [`DEFAULT_LOG_FILE`]). Verbosity follows `RUST_LOG` and falls back to `info`,
/// which keeps per-insert and per-scan summaries but hides count/upgrade debug
/// lines. Call after `dotenvy::dotenv()` so a `RUST_LOG` in `.env` applies.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    let file = Arc::new(open_log_file(log_file_path)?);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout.and(file))
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(false)
        .with_line_number(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("chatdb tracing already initialized: {}", e))?;

    Ok(())
}
