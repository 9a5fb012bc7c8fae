//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Marks a record as "looked up, confirmed unresolvable".
    ///
    /// Never a real location in this domain.
    pub const SENTINEL: Coordinates = Coordinates {
        latitude: -1.0,
        longitude: -1.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both values are finite and inside geographic ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// An API key for the geocoding provider.
///
/// `Debug` and `Display` show at most the first four characters, and
/// nothing at all of keys shorter than [`Credential::MIN_SHOWN_LEN`], so
/// a credential can be logged without leaking it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Shortest key whose prefix is shown when logging.
    pub const MIN_SHOWN_LEN: usize = 12;

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for building provider requests.
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn masked(&self) -> String {
        if self.0.chars().count() < Self::MIN_SHOWN_LEN {
            return "***".to_string();
        }
        let prefix: String = self.0.chars().take(4).collect();
        format!("{}***", prefix)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Result of resolving a single profile location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionOutcome {
    /// Coordinates to attach to the record: a real match, the record's own
    /// coordinates, or [`Coordinates::SENTINEL`].
    Found(Coordinates),
    /// The lookup produced nothing usable; leave the record unchanged.
    NotFound,
    /// No lookup was needed.
    Skipped,
}

impl ResolutionOutcome {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Found(c) => Some(*c),
            Self::NotFound | Self::Skipped => None,
        }
    }
}
