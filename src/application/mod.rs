//! Application Layer
//!
//! Use cases wiring the domain to the ports.

pub mod credential_pool;
pub mod geocode_resolver;
pub mod profile_fixer;

pub use credential_pool::{CredentialPool, Lease};
pub use geocode_resolver::{GeocodeResolver, ResolverConfig};
pub use profile_fixer::{FixedProfile, ProfileGeoFixer};
