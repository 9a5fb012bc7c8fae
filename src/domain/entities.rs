//! Domain Entities - Core business objects
//!
//! These entities represent the records flowing through the geo-fix stage.
//! They contain only business logic, no I/O.

use crate::domain::value_objects::{Coordinates, ResolutionOutcome};
use serde::{Deserialize, Serialize};

/// A user profile record as it travels through the enrichment pipeline.
///
/// Only the location fields are interpreted here. Every other field is kept
/// verbatim in `extra` so records are forwarded without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Free-text location as entered by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Fields owned by other pipeline stages
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    /// Read-only view of the fields the resolver looks at.
    pub fn location_view(&self) -> ProfileLocation {
        ProfileLocation {
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Merge a resolution outcome into the record.
    ///
    /// Returns true if the stored coordinates changed.
    pub fn apply(&mut self, outcome: &ResolutionOutcome) -> bool {
        let Some(coords) = outcome.coordinates() else {
            return false;
        };
        let changed =
            self.latitude != Some(coords.latitude) || self.longitude != Some(coords.longitude);
        self.latitude = Some(coords.latitude);
        self.longitude = Some(coords.longitude);
        changed
    }
}

/// The location part of a profile: what the resolution gate inspects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileLocation {
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ProfileLocation {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            latitude: None,
            longitude: None,
        }
    }

    /// Attach already-known coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Both coordinates, if both are set.
    pub fn known_coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

/// A single match returned by a forward-geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub coordinates: Coordinates,
    /// Provider's normalized address, if it returns one
    pub formatted_address: Option<String>,
}

impl GeocodeMatch {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Coordinates::new(latitude, longitude),
            formatted_address: None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let raw = json!({
            "username": "frapontillo",
            "source": "twitter",
            "location": "Bari, Italy",
            "followers": 120
        });

        let profile: Profile = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(profile.location.as_deref(), Some("Bari, Italy"));
        assert!(profile.latitude.is_none());
        assert_eq!(profile.extra.len(), 3);

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_profile_without_location_fields() {
        let profile: Profile = serde_json::from_str(r#"{"username":"x"}"#).unwrap();
        assert!(profile.location.is_none());
        assert!(profile.latitude.is_none());
        assert!(profile.longitude.is_none());
    }

    #[test]
    fn test_location_view() {
        let profile = Profile {
            location: Some("Paris".to_string()),
            latitude: Some(1.0),
            longitude: None,
            extra: Default::default(),
        };
        let view = profile.location_view();
        assert_eq!(view.location.as_deref(), Some("Paris"));
        assert_eq!(view.latitude, Some(1.0));
        assert!(view.known_coordinates().is_none());
    }

    #[test]
    fn test_apply_found_sets_coordinates() {
        let mut profile = Profile::default();
        let changed = profile.apply(&ResolutionOutcome::Found(Coordinates::new(48.8566, 2.3522)));
        assert!(changed);
        assert_eq!(profile.latitude, Some(48.8566));
        assert_eq!(profile.longitude, Some(2.3522));
    }

    #[test]
    fn test_apply_same_coordinates_reports_unchanged() {
        let mut profile = Profile {
            latitude: Some(10.0),
            longitude: Some(20.0),
            ..Default::default()
        };
        let same = ResolutionOutcome::Found(Coordinates::new(10.0, 20.0));
        assert!(!profile.apply(&same));
    }

    #[test]
    fn test_apply_not_found_and_skipped_leave_record() {
        let mut profile = Profile {
            location: Some("Nowhere".to_string()),
            latitude: Some(3.0),
            ..Default::default()
        };
        let before = profile.clone();
        assert!(!profile.apply(&ResolutionOutcome::NotFound));
        assert!(!profile.apply(&ResolutionOutcome::Skipped));
        assert_eq!(profile, before);
    }

    #[test]
    fn test_known_coordinates_requires_both() {
        assert!(ProfileLocation::new("x").known_coordinates().is_none());
        assert_eq!(
            ProfileLocation::new("x").with_coordinates(1.0, 2.0).known_coordinates(),
            Some(Coordinates::new(1.0, 2.0))
        );
    }
}
