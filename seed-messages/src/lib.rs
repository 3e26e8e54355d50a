//! # seed-messages
//!
//! Synthetic [`chat_core::StoredMessage`] producer and random query windows, used to
//! fill the message store and to drive range queries against it.

pub mod generate;

pub use generate::{
    generate_messages, generate_mid, generate_random_message, generate_random_string,
    generate_random_text_message, generate_random_time_range_within_last_month,
    generate_random_timestamp_within_last_month, messages_from_env, now_millis,
    ONE_MONTH_MILLIS,
};
