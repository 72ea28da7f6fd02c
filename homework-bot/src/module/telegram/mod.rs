//! Telegram delivery of status and error notifications.

pub mod notifier;

pub use notifier::{Notifier, TelegramNotifier, notify};
