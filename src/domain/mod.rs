//! Domain Layer
//!
//! Records, value objects, ports and pure decision logic of the geo-fix
//! stage. Nothing in here performs I/O.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{GeocodeMatch, Profile, ProfileLocation};
pub use value_objects::{Coordinates, Credential, ResolutionOutcome};
