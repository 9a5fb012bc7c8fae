//! Adapters Layer
//!
//! Inbound adapters drive the application (stream input); outbound
//! adapters implement the domain ports (geocoding provider).

pub mod inbound;
pub mod outbound;
