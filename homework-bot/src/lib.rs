pub mod config;
pub mod error;
pub mod logging;
pub mod module;

pub use error::{BotError, Result};
