//! Command bodies, written against the `Repository` trait so they run on any open store.

use anyhow::{bail, Context, Result};
use chat_core::{MessageContent, StoredMessage, TimeRange};
use message_store::Repository;
use rand::Rng;
use tracing::{info, warn};

const TEXT_PREVIEW_LEN: usize = 40;

/// Generates `rows` synthetic messages and inserts them as one batch.
pub async fn generate_and_insert<R, G>(repo: &R, rng: &mut G, rows: usize) -> Result<usize>
where
    R: Repository + ?Sized,
    G: Rng + ?Sized,
{
    let records = seed_messages::generate_messages(rng, rows);
    repo.insert_rows(&records)
        .await
        .with_context(|| format!("Insert {} generated rows", rows))?;

    info!("{} rows inserted successfully.", rows);
    Ok(records.len())
}

/// Both bounds, or neither for a random window within the last month; one alone is an error.
///
/// An inverted explicit range is accepted (it matches nothing) but logged.
pub fn resolve_range<G: Rng + ?Sized>(
    start: Option<i64>,
    end: Option<i64>,
    rng: &mut G,
    now: i64,
) -> Result<TimeRange> {
    let range = match (start, end) {
        (Some(start), Some(end)) => TimeRange::new(start, end),
        (None, None) => seed_messages::generate_random_time_range_within_last_month(rng, now),
        _ => bail!("--start and --end must be given together"),
    };
    if range.is_inverted() {
        warn!(
            start_time = range.start_time,
            end_time = range.end_time,
            "--start is after --end, the query will match nothing"
        );
    }
    Ok(range)
}

/// One-line summary of a message for terminal output.
pub fn preview(message: &StoredMessage) -> String {
    let MessageContent::Text { text } = &message.message_content;
    let body: String = text.text.chars().take(TEXT_PREVIEW_LEN).collect();
    let date = chrono::DateTime::from_timestamp_millis(message.date)
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| message.date.to_string());

    format!(
        "{:<42} {:<20} {:<10} {}",
        message.mid, date, message.conversation_id, body
    )
}
