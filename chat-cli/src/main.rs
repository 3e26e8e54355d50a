//! chatdb CLI: fill the message store with synthetic messages and run date-range queries against it.
//! Config from env (`.env` supported).

use std::time::Instant;

use anyhow::{Context, Result};
use chat_cli::{generate_and_insert, preview, resolve_range, Cli, CliConfig, Commands};
use clap::Parser;
use message_store::{MessageStoreHandler, Repository};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = CliConfig::load();
    chat_core::init_tracing(&config.log_file)?;

    let mut handler = MessageStoreHandler::new(config.store.clone());
    handler.open().await.with_context(|| {
        format!(
            "Open store {:?} in {:?} (check CHAT_DATA_DIR)",
            config.store.db_name, config.store.data_dir
        )
    })?;

    match cli.command {
        Commands::Generate { rows } => handle_generate(&handler, rows).await,
        Commands::Query { start, end, show } => handle_query(&handler, start, end, show).await,
        Commands::Count => {
            let count = handler.count_messages().await?;
            println!("{} message(s) stored.", count);
            Ok(())
        }
    }
}

async fn handle_generate(handler: &MessageStoreHandler, rows: usize) -> Result<()> {
    let started = Instant::now();
    let inserted = generate_and_insert(handler, &mut rand::thread_rng(), rows).await?;
    println!(
        "{} rows inserted successfully ({} ms).",
        inserted,
        started.elapsed().as_millis()
    );
    Ok(())
}

async fn handle_query(
    handler: &MessageStoreHandler,
    start: Option<i64>,
    end: Option<i64>,
    show: usize,
) -> Result<()> {
    let now = chrono::Utc::now().timestamp_millis();
    let range = resolve_range(start, end, &mut rand::thread_rng(), now)?;

    let started = Instant::now();
    let messages = handler
        .get_messages_in(&range)
        .await
        .context("Query messages by date range")?;

    println!(
        "{} message(s) in [{}, {}] ({} ms).",
        messages.len(),
        range.start_time,
        range.end_time,
        started.elapsed().as_millis()
    );
    for message in messages.iter().take(show) {
        println!("{}", preview(message));
    }
    Ok(())
}
