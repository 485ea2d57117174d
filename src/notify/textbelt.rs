//! Textbelt SMS delivery
//!
//! Posts `phone`, `message` and `key` as a form and interprets the JSON reply.
//! Without an API key the shared free key is used (one text per day per IP).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::notify::{DeliveryReport, Notifier};

/// Public Textbelt endpoint
pub const DEFAULT_ENDPOINT: &str = "https://textbelt.com/text";

/// Key accepted by Textbelt for the free tier
pub const FREE_KEY: &str = "textbelt";

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Reply body from the Textbelt API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextbeltResponse {
    success: bool,
    #[serde(default)]
    text_id: Option<serde_json::Value>,
    #[serde(default)]
    quota_remaining: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

impl TextbeltResponse {
    fn into_report(self) -> DeliveryReport {
        if self.success {
            return DeliveryReport::Sent {
                id: self.text_id.map(|id| match id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                }),
                quota_remaining: self.quota_remaining,
            };
        }
        if self.quota_remaining == Some(0) {
            return DeliveryReport::QuotaExhausted;
        }
        DeliveryReport::Failed {
            error: self.error.unwrap_or_else(|| "Unknown error".to_string()),
        }
    }
}

/// Sends notices through Textbelt
pub struct TextbeltNotifier {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl TextbeltNotifier {
    /// Create a notifier for `endpoint`, using the free key when `api_key` is `None`
    pub fn new(endpoint: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        })
    }

    /// Whether a paid key is configured
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or(FREE_KEY)
    }

    async fn post(&self, destination: &str, body: &str) -> reqwest::Result<TextbeltResponse> {
        self.client
            .post(&self.endpoint)
            .form(&[
                ("phone", destination.trim()),
                ("message", body),
                ("key", self.key()),
            ])
            .send()
            .await?
            .json::<TextbeltResponse>()
            .await
    }
}

#[async_trait]
impl Notifier for TextbeltNotifier {
    async fn send(&self, destination: &str, body: &str) -> DeliveryReport {
        debug!(paid = self.has_api_key(), "sending notice via Textbelt");
        match self.post(destination, body).await {
            Ok(response) => response.into_report(),
            Err(e) => {
                warn!(error = %e, "Textbelt request failed");
                DeliveryReport::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
