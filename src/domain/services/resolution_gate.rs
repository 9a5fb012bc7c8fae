//! Resolution Gate
//!
//! Cheap, side-effect free pre-check that decides whether a profile needs
//! an external lookup at all.

use crate::domain::entities::ProfileLocation;
use crate::domain::value_objects::Coordinates;

/// What to do with a profile location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision<'a> {
    /// Nothing to look up (no location text)
    Skip,
    /// The record already carries both coordinates
    Known(Coordinates),
    /// Ask the provider for this text
    Lookup(&'a str),
}

/// Stateless gate in front of the geocode resolver.
pub struct ResolutionGate;

impl ResolutionGate {
    /// Inspect a location and decide whether a lookup is needed.
    ///
    /// Existing coordinates win over the location text, so re-resolving an
    /// already resolved record reproduces its own coordinates.
    pub fn inspect(location: &ProfileLocation) -> GateDecision<'_> {
        let text = match location.location.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => return GateDecision::Skip,
        };

        if let Some(coords) = location.known_coordinates() {
            return GateDecision::Known(coords);
        }

        GateDecision::Lookup(text)
    }
}
