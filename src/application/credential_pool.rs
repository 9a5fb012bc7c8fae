//! Credential Pool
//!
//! Circular pool of provider credentials together with the client built
//! for the active one.

use crate::config::ConfigError;
use crate::domain::ports::{GeocodingClient, GeocodingClientFactory};
use crate::domain::value_objects::Credential;
use parking_lot::Mutex;
use std::sync::Arc;

/// The active credential slot: cursor plus the client built for it.
struct ActiveSlot {
    index: usize,
    client: Arc<dyn GeocodingClient>,
}

/// Snapshot of the active client, taken under the pool lock.
///
/// Holding a lease does not hold the lock; provider calls are made on the
/// leased client after the lock is released.
#[derive(Clone)]
pub struct Lease {
    pub index: usize,
    pub client: Arc<dyn GeocodingClient>,
}

/// Ordered, non-empty set of credentials with a shared rotation cursor.
///
/// Reading the active client and rotating to the next credential both run
/// inside one critical section, and the critical section never awaits, so
/// concurrent rotations are serialized and a cancelled caller cannot leave
/// the pool half-rotated.
pub struct CredentialPool {
    credentials: Vec<Credential>,
    factory: Arc<dyn GeocodingClientFactory>,
    active: Mutex<ActiveSlot>,
}

impl CredentialPool {
    /// Create a pool starting at the first credential.
    ///
    /// Fails if no credential is given.
    pub fn new(
        credentials: Vec<Credential>,
        factory: Arc<dyn GeocodingClientFactory>,
    ) -> Result<Self, ConfigError> {
        let first = credentials
            .first()
            .ok_or(ConfigError::EmptyCredentialPool)?;
        let client = factory.client_for(first);

        Ok(Self {
            credentials,
            factory,
            active: Mutex::new(ActiveSlot { index: 0, client }),
        })
    }

    /// Number of credentials in the pool.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// A constructed pool is never empty.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active.lock().index
    }

    pub fn active_credential(&self) -> Credential {
        let index = self.active.lock().index;
        self.credentials[index].clone()
    }

    /// Lease the currently active client.
    pub fn current(&self) -> Lease {
        let slot = self.active.lock();
        Lease {
            index: slot.index,
            client: slot.client.clone(),
        }
    }

    /// Advance the cursor by one (wrapping) and rebuild the client.
    ///
    /// Every call advances exactly once, regardless of how many other
    /// callers rotated in the meantime.
    pub fn rotate(&self) -> Lease {
        let mut slot = self.active.lock();
        let next = (slot.index + 1) % self.credentials.len();
        let credential = &self.credentials[next];
        let client = self.factory.client_for(credential);

        slot.index = next;
        slot.client = client.clone();

        tracing::info!(
            "switching geocoding credential to #{} ({})",
            next,
            credential
        );

        Lease {
            index: next,
            client,
        }
    }
}
