//! Geocoding Provider Port
//!
//! Defines the interface for forward geocoding (free text to coordinates)
//! and the error taxonomy the resolver relies on.

use crate::domain::entities::GeocodeMatch;
use crate::domain::value_objects::Credential;
use async_trait::async_trait;
use std::sync::Arc;

/// Which provider limit was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaKind {
    /// Daily request allowance used up
    Daily,
    /// Too many queries per second
    PerSecond,
}

/// Failures reported by a geocoding provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("quota exceeded ({0:?})")]
    QuotaExceeded(QuotaKind),
    #[error("provider call timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: String, message: String },
}

impl ProviderError {
    /// Quota errors are the only ones recovered by rotating credentials.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_))
    }
}

/// A provider client bound to one credential.
///
/// This is an outbound port; implementations talk to Google Maps or any
/// other forward-geocoding service.
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Look up a free-text address.
    ///
    /// Returns all matches in provider order; an empty list means the
    /// provider knows no such place.
    async fn forward(&self, address: &str) -> Result<Vec<GeocodeMatch>, ProviderError>;
}

/// Builds provider clients for a given credential.
///
/// Called once at startup and again on every credential rotation, while
/// the rotation lock is held, so it must not block.
pub trait GeocodingClientFactory: Send + Sync {
    fn client_for(&self, credential: &Credential) -> Arc<dyn GeocodingClient>;
}
