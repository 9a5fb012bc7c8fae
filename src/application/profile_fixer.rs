//! Profile Geo Fixer
//!
//! Caller side of the resolver: merges resolution outcomes back into
//! profile records and always hands the record on.

use crate::application::geocode_resolver::GeocodeResolver;
use crate::domain::entities::Profile;
use crate::domain::value_objects::ResolutionOutcome;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;

/// A fixed record and what happened to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedProfile {
    pub profile: Profile,
    pub outcome: ResolutionOutcome,
    /// Whether the record's coordinates changed
    pub changed: bool,
}

/// Pipeline stage that attaches coordinates to profiles.
#[derive(Clone)]
pub struct ProfileGeoFixer {
    resolver: Arc<GeocodeResolver>,
}

impl ProfileGeoFixer {
    pub fn new(resolver: Arc<GeocodeResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve and merge, keeping the outcome for reporting.
    pub async fn fix_reporting(&self, mut profile: Profile) -> FixedProfile {
        let outcome = self.resolver.resolve(&profile.location_view()).await;
        let changed = profile.apply(&outcome);
        FixedProfile {
            profile,
            outcome,
            changed,
        }
    }

    /// Resolve and merge. The record is returned whether or not it was fixed.
    pub async fn fix(&self, profile: Profile) -> Profile {
        self.fix_reporting(profile).await.profile
    }

    /// The stage as a plain function value for a hosting pipeline.
    pub fn stage(
        &self,
    ) -> impl Fn(Profile) -> BoxFuture<'static, Profile> + Clone + Send + Sync + 'static {
        let fixer = self.clone();
        move |profile: Profile| {
            let fixer = fixer.clone();
            async move { fixer.fix(profile).await }.boxed()
        }
    }
}
