//! # chat-cli
//!
//! `chatdb` command line: argument parsing, config loading, and the generate/query/count
//! commands run against a [`message_store::MessageStoreHandler`].

pub mod cli;
pub mod commands;

pub use cli::{Cli, CliConfig, Commands};
pub use commands::{generate_and_insert, preview, resolve_range};
