//! Generate random StoredMessage records and query windows.
//!
//! Every generator takes the RNG and the current time explicitly so callers
//! (and tests) control both.

use anyhow::Result;
use chat_core::{MessageContent, StoredMessage, TextContent, TimeRange};
use chrono::Utc;
use rand::Rng;

/// Thirty days in milliseconds; "last month" for every generator here.
pub const ONE_MONTH_MILLIS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Largest integer a JSON number holds exactly.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const TEXT_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_-+=<>?/{}[]";

const DEFAULT_STRING_LEN: usize = 8;
const MIN_TEXT_LEN: usize = 100;
const MAX_TEXT_LEN: usize = 1200;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Message id of the form `-<a>|<b>`.
pub fn generate_mid<R: Rng + ?Sized>(rng: &mut R) -> String {
    let part1 = rng.gen_range(0..MAX_SAFE_INTEGER);
    let part2 = rng.gen_range(0..MAX_SAFE_INTEGER);
    format!("-{}|{}", part1, part2)
}

/// Alphanumeric string of `len` characters.
pub fn generate_random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    random_from_charset(rng, ID_CHARSET, len)
}

/// Message body between 100 and 1200 characters (upper bound exclusive).
pub fn generate_random_text_message<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(MIN_TEXT_LEN..MAX_TEXT_LEN);
    random_from_charset(rng, TEXT_CHARSET, len)
}

/// Timestamp in `(now - 30 days, now]`.
pub fn generate_random_timestamp_within_last_month<R: Rng + ?Sized>(rng: &mut R, now: i64) -> i64 {
    now - rng.gen_range(0..ONE_MONTH_MILLIS)
}

/// Query window starting within the last month; `end_time` may lie past `now`.
pub fn generate_random_time_range_within_last_month<R: Rng + ?Sized>(
    rng: &mut R,
    now: i64,
) -> TimeRange {
    let start_time = generate_random_timestamp_within_last_month(rng, now);
    let end_time = start_time + rng.gen_range(0..ONE_MONTH_MILLIS);
    TimeRange::new(start_time, end_time)
}

/// One synthetic message dated `now`.
pub fn generate_random_message<R: Rng + ?Sized>(rng: &mut R, now: i64) -> StoredMessage {
    let forward_len = rng.gen_range(0..5);
    let media_len = rng.gen_range(0..3);
    let mentions_len = rng.gen_range(0..3);
    let reply_len = rng.gen_range(0..5);

    StoredMessage {
        clock: generate_random_timestamp_within_last_month(rng, now),
        conversation_id: generate_random_string(rng, DEFAULT_STRING_LEN),
        date: now,
        edited_at: now - rng.gen_range(0..100_000),
        forward: (0..forward_len).map(|_| rng.gen_range(0..100)).collect(),
        host_peer_id: rng.gen_range(0..100),
        is_temp_message: rng.gen_bool(0.5),
        message_content: MessageContent::text(TextContent {
            markdown: rng.gen_bool(0.5),
            media: strings(rng, media_len),
            mentions: strings(rng, mentions_len),
            text: generate_random_text_message(rng),
        }),
        mid: generate_mid(rng),
        prev_mid: generate_random_string(rng, DEFAULT_STRING_LEN),
        random_id: generate_random_string(rng, DEFAULT_STRING_LEN),
        ref_type: optional_string(rng),
        reply: strings(rng, reply_len),
        sender_peer_id: optional_string(rng),
        sender_uid: rng.gen_range(0..100),
        source: generate_random_string(rng, DEFAULT_STRING_LEN),
        state: generate_random_string(rng, DEFAULT_STRING_LEN),
        thread_id: generate_random_string(rng, DEFAULT_STRING_LEN),
    }
}

/// `n` synthetic messages, all dated at call time.
pub fn generate_messages<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<StoredMessage> {
    let now = now_millis();
    (0..n).map(|_| generate_random_message(rng, now)).collect()
}

/// Generates messages with the thread RNG; count from `SEED_MESSAGES_COUNT` (default 100).
pub fn messages_from_env() -> Result<Vec<StoredMessage>> {
    let count = match std::env::var("SEED_MESSAGES_COUNT") {
        Ok(s) => s.trim().parse::<usize>()?,
        Err(_) => 100,
    };
    Ok(generate_messages(&mut rand::thread_rng(), count))
}

fn random_from_charset<R: Rng + ?Sized>(rng: &mut R, charset: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

fn strings<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<String> {
    (0..n)
        .map(|_| generate_random_string(rng, DEFAULT_STRING_LEN))
        .collect()
}

fn optional_string<R: Rng + ?Sized>(rng: &mut R) -> Option<String> {
    if rng.gen_bool(0.5) {
        Some(generate_random_string(rng, DEFAULT_STRING_LEN))
    } else {
        None
    }
}
