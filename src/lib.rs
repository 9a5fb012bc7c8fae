//! profile-geofix Library
//!
//! Resolves missing coordinates on user-profile records through a forward
//! geocoding provider, rotating API keys when the provider reports quota
//! exhaustion.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::inbound::{JsonLinesPipeline, PipelineStats};
pub use adapters::outbound::GoogleMapsGeocoder;
pub use application::{CredentialPool, GeocodeResolver, ProfileGeoFixer, ResolverConfig};
pub use config::{load_config, Config, ConfigError};
pub use domain::entities::{GeocodeMatch, Profile, ProfileLocation};
pub use domain::ports::{GeocodingClient, GeocodingClientFactory, ProviderError, QuotaKind};
pub use domain::value_objects::{Coordinates, Credential, ResolutionOutcome};
