//! Homework review API: request, response checks and status messages.

pub mod client;
pub mod parser;
pub mod types;

pub use client::PracticumClient;
pub use parser::{NOTHING_NEW, current_date, describe, latest_homework, validate};
pub use types::Verdict;
