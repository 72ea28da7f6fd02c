//! Homework review API client
//!
//! One GET per poll cycle, no retries here: the poll loop retries on its
//! next scheduled cycle.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::error::{BotError, Result};

pub struct PracticumClient {
    client: Client,
    endpoint: Url,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| BotError::Config(format!("invalid API endpoint '{}': {}", endpoint, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| BotError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint,
            token: token.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Fetch homework statuses changed since `timestamp` (unix seconds).
    ///
    /// Returns the decoded JSON body as-is; shape checks happen in
    /// [`super::parser::validate`].
    pub async fn fetch(&self, timestamp: i64) -> Result<Value> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("from_date", &timestamp.to_string());

        tracing::debug!("Requesting homework statuses from {} (from_date={})", self.endpoint, timestamp);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .send()
            .await
            .map_err(|source| self.request_error(source))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(BotError::InvalidToken {
                    status: response.status().as_u16(),
                });
            }
            StatusCode::BAD_REQUEST => return Err(BotError::BadTimestamp { timestamp }),
            other => {
                return Err(BotError::UnexpectedApiStatus {
                    endpoint: self.endpoint.to_string(),
                    status: other.as_u16(),
                });
            }
        }

        let body = response
            .text()
            .await
            .map_err(|source| self.request_error(source))?;

        serde_json::from_str(&body).map_err(BotError::JsonDecode)
    }

    fn request_error(&self, source: reqwest::Error) -> BotError {
        BotError::Request {
            endpoint: self.endpoint.to_string(),
            source,
        }
    }
}
