//! Geocode Resolver - Main application use case
//!
//! Resolves a profile location to coordinates: runs the resolution gate,
//! calls the provider, rotates credentials on quota exhaustion and maps
//! the result onto a [`ResolutionOutcome`].

use crate::application::credential_pool::{CredentialPool, Lease};
use crate::config::ConfigError;
use crate::domain::entities::{GeocodeMatch, ProfileLocation};
use crate::domain::ports::{GeocodingClientFactory, ProviderError};
use crate::domain::services::{GateDecision, ResolutionGate};
use crate::domain::value_objects::{Coordinates, Credential, ResolutionOutcome};
use std::sync::Arc;
use std::time::Duration;

/// Resolver behaviour.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Answer "no match" with [`Coordinates::SENTINEL`] instead of `NotFound`
    pub sentinel_on_not_found: bool,
    /// Bound on every single provider call (default: 10s)
    pub call_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            sentinel_on_not_found: false,
            call_timeout: Duration::from_secs(10),
        }
    }
}

impl ResolverConfig {
    pub fn new(sentinel_on_not_found: bool) -> Self {
        Self {
            sentinel_on_not_found,
            ..Default::default()
        }
    }

    /// Set the per-call timeout.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// Geocode resolver.
///
/// Owns the credential pool. Safe to share between concurrent lookups:
/// the only shared mutable state is the pool, and provider calls happen
/// outside its lock.
pub struct GeocodeResolver {
    pool: CredentialPool,
    config: ResolverConfig,
}

impl GeocodeResolver {
    /// Build a resolver over the given credentials.
    ///
    /// Refuses to start without at least one credential.
    pub fn new(
        credentials: Vec<Credential>,
        factory: Arc<dyn GeocodingClientFactory>,
        config: ResolverConfig,
    ) -> Result<Self, ConfigError> {
        let pool = CredentialPool::new(credentials, factory)?;
        Ok(Self { pool, config })
    }

    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Resolve a profile location.
    ///
    /// Never fails: provider problems degrade to `NotFound` so the
    /// pipeline keeps flowing.
    pub async fn resolve(&self, location: &ProfileLocation) -> ResolutionOutcome {
        match ResolutionGate::inspect(location) {
            GateDecision::Skip => {
                tracing::debug!("no location text, skipping lookup");
                ResolutionOutcome::Skipped
            }
            GateDecision::Known(coords) => {
                tracing::debug!("coordinates already known: {}", coords);
                ResolutionOutcome::Found(coords)
            }
            GateDecision::Lookup(address) => self.lookup(address).await,
        }
    }

    /// Forward-geocode an address, rotating once on quota exhaustion.
    ///
    /// At most two provider calls are made.
    pub async fn lookup(&self, address: &str) -> ResolutionOutcome {
        let lease = self.pool.current();

        let result = match self.call(&lease, address).await {
            Err(e) if e.is_quota_exceeded() => {
                tracing::warn!("credential #{}: {}", lease.index, e);
                tracing::debug!("retrying {:?} with the next credential", address);
                let retry = self.pool.rotate();
                self.call(&retry, address).await
            }
            other => other,
        };

        match result {
            Ok(matches) => self.outcome_for(address, matches),
            Err(e) => {
                tracing::warn!("geocoding failed: {}", e);
                tracing::debug!("no coordinates for {:?} after failure", address);
                ResolutionOutcome::NotFound
            }
        }
    }

    async fn call(&self, lease: &Lease, address: &str) -> Result<Vec<GeocodeMatch>, ProviderError> {
        match tokio::time::timeout(self.config.call_timeout, lease.client.forward(address)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        }
    }

    fn outcome_for(&self, address: &str, matches: Vec<GeocodeMatch>) -> ResolutionOutcome {
        match matches.into_iter().next() {
            Some(first) => {
                let place = first.formatted_address.as_deref().unwrap_or("-");
                tracing::debug!(
                    "geocoded {:?} to {} [{}]",
                    address,
                    first.coordinates,
                    place
                );
                ResolutionOutcome::Found(first.coordinates)
            }
            None if self.config.sentinel_on_not_found => {
                tracing::debug!("no match for {:?}, using sentinel", address);
                ResolutionOutcome::Found(Coordinates::SENTINEL)
            }
            None => {
                tracing::debug!("no match for {:?}", address);
                ResolutionOutcome::NotFound
            }
        }
    }
}
