use homework_bot::config::{self, Credentials};
use homework_bot::logging;
use homework_bot::module::homework::PracticumClient;
use homework_bot::module::scheduled::Poller;
use homework_bot::module::telegram::TelegramNotifier;

use anyhow::{Context, Result};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::read_config()?;

    // Initialize logging
    let _logging_guard = logging::init_logging(&config.log_dir, "homework-bot", &config.log_level)?;

    tracing::info!("Homework bot starting...");

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("CRITICAL: {}. Bot stopped.", e);
            return Err(e.into());
        }
    };

    let client = PracticumClient::new(
        &config.endpoint,
        &credentials.practicum_token,
        config.request_timeout(),
    )
    .context("Failed to create homework API client")?;
    let notifier = TelegramNotifier::new(
        &config.telegram_api_url,
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
    )
    .context("Failed to create Telegram notifier")?;

    let poller = Poller::new(client, notifier, config.retry_period());

    tokio::select! {
        result = poller.run() => {
            result.context("Homework poller stopped")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            tracing::info!("Shutdown signal received.");
        }
    }

    Ok(())
}
