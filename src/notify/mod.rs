//! Notice delivery
//!
//! A [`Notifier`] sends a rendered notice to one destination and reports how
//! it went. Delivery problems are reported, never raised.

pub mod textbelt;

use async_trait::async_trait;

pub use textbelt::TextbeltNotifier;

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// Accepted by the provider
    Sent {
        /// Provider message id, if returned
        id: Option<String>,
        /// Messages left on the account, if reported
        quota_remaining: Option<i64>,
    },
    /// The account has no quota left
    QuotaExhausted,
    /// Rejected or not reachable
    Failed {
        /// Provider or transport error
        error: String,
    },
}

impl DeliveryReport {
    /// Whether the message went out
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Sends short text messages
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `body` to `destination`
    async fn send(&self, destination: &str, body: &str) -> DeliveryReport;
}
