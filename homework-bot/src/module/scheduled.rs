//! Homework status poll loop
//!
//! Each cycle: fetch → validate → describe → notify, then sleep for the
//! retry period. Cycles run strictly one after another.

use std::time::Duration;

use chrono::Utc;

use super::homework::{self, PracticumClient};
use super::telegram::{Notifier, notify};
use crate::error::Result;

/// Prefix of every error notification sent to the chat.
pub const ERROR_MESSAGE_PREFIX: &str = "Сбой в работе программы";

/// Result of one successful poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was sent.
    Notified(String),
    /// The latest homework still has the previously sent status.
    Unchanged,
    /// The response contained no homework.
    NothingNew,
}

/// Poll loop state: the request cursor and the last messages sent, used to
/// suppress repeats.
pub struct Poller<N: Notifier> {
    client: PracticumClient,
    notifier: N,
    period: Duration,
    cursor: i64,
    last_status: Option<String>,
    last_error: Option<String>,
}

impl<N: Notifier> Poller<N> {
    /// Create a poller whose first request covers the last `period`.
    pub fn new(client: PracticumClient, notifier: N, period: Duration) -> Self {
        let period_secs = i64::try_from(period.as_secs()).unwrap_or(i64::MAX);
        Self {
            client,
            notifier,
            period,
            cursor: Utc::now().timestamp().saturating_sub(period_secs),
            last_status: None,
            last_error: None,
        }
    }

    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run cycles forever. Returns only when a cycle fails with a
    /// non-transient error.
    pub async fn run(mut self) -> Result<()> {
        tracing::info!(
            "Starting homework poller (endpoint: {}, period: {}s, cursor: {})",
            self.client.endpoint(),
            self.period.as_secs(),
            self.cursor
        );

        loop {
            self.run_cycle().await?;

            tracing::debug!("Next poll in {}s", self.period.as_secs());
            tokio::time::sleep(self.period).await;
        }
    }

    /// Run one cycle and handle its failure. Transient errors are logged and
    /// reported to the chat unless the same message was reported last time.
    pub async fn run_cycle(&mut self) -> Result<()> {
        match self.poll_once().await {
            Ok(_) => {
                self.last_error = None;
                Ok(())
            }
            Err(e) if !e.is_transient() => Err(e),
            Err(e) => {
                let message = format!("{}: {}", ERROR_MESSAGE_PREFIX, e);
                tracing::error!("{}", message);

                if self.last_error.as_deref() == Some(message.as_str()) {
                    tracing::debug!("Error already reported, notification suppressed");
                } else {
                    notify(&self.notifier, &message).await;
                }
                self.last_error = Some(message);
                Ok(())
            }
        }
    }

    /// One fetch → validate → describe → notify pass. The cursor only moves
    /// once the whole pass succeeded.
    pub async fn poll_once(&mut self) -> Result<CycleOutcome> {
        let response = self.client.fetch(self.cursor).await?;
        let response = homework::validate(response)?;
        let next_cursor = homework::current_date(&response)?;

        let outcome = match homework::latest_homework(&response) {
            Some(record) => {
                let message = homework::describe(Some(record))?;
                if self.last_status.as_deref() == Some(message.as_str()) {
                    tracing::debug!("Homework status unchanged");
                    CycleOutcome::Unchanged
                } else {
                    notify(&self.notifier, &message).await;
                    self.last_status = Some(message.clone());
                    CycleOutcome::Notified(message)
                }
            }
            None => {
                tracing::debug!("{}", homework::describe(None)?);
                CycleOutcome::NothingNew
            }
        };

        tracing::debug!("Cursor advanced {} -> {}", self.cursor, next_cursor);
        self.cursor = next_cursor;
        Ok(outcome)
    }
}

impl<N: Notifier> std::fmt::Debug for Poller<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("endpoint", &self.client.endpoint())
            .field("period", &self.period)
            .field("cursor", &self.cursor)
            .field("last_status", &self.last_status)
            .field("last_error", &self.last_error)
            .finish()
    }
}
