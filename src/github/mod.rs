pub mod client;

pub use client::{clean_message, CommitClient, CommitSummary};
