//! Google Maps Geocoder
//!
//! Implements the geocoding ports on top of the Google Maps Geocoding API.
//!
//! See: https://developers.google.com/maps/documentation/geocoding/requests-geocoding

use crate::domain::entities::GeocodeMatch;
use crate::domain::ports::{GeocodingClient, GeocodingClientFactory, ProviderError, QuotaKind};
use crate::domain::value_objects::{Coordinates, Credential};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

/// Response from the geocoding endpoint.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Builds Google Maps clients, one per credential.
///
/// All clients share one `reqwest::Client` (and its connection pool), so
/// building a client on rotation is cheap and cannot fail.
pub struct GoogleMapsGeocoder {
    http: reqwest::Client,
    endpoint: String,
}

impl GoogleMapsGeocoder {
    /// Create a geocoder for the given API base URL.
    ///
    /// `timeout` bounds every request, including reading the body.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GEOCODE_PATH),
        })
    }
}

impl GeocodingClientFactory for GoogleMapsGeocoder {
    fn client_for(&self, credential: &Credential) -> Arc<dyn GeocodingClient> {
        Arc::new(GoogleMapsClient {
            http: self.http.clone(),
            endpoint: self.endpoint.clone(),
            credential: credential.clone(),
        })
    }
}

/// Google Maps client bound to a single API key.
pub struct GoogleMapsClient {
    http: reqwest::Client,
    endpoint: String,
    credential: Credential,
}

#[async_trait]
impl GeocodingClient for GoogleMapsClient {
    async fn forward(&self, address: &str) -> Result<Vec<GeocodeMatch>, ProviderError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.credential.expose())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::QuotaExceeded(QuotaKind::PerSecond));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.to_string(),
                message: body,
            });
        }

        let body: GeocodeResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Malformed(e.to_string())
            }
        })?;

        parse_response(body)
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(e.to_string())
    }
}

/// Map the API status onto matches or the provider error taxonomy.
fn parse_response(body: GeocodeResponse) -> Result<Vec<GeocodeMatch>, ProviderError> {
    match body.status.as_str() {
        "OK" => body
            .results
            .into_iter()
            .map(|r| {
                let coordinates =
                    Coordinates::new(r.geometry.location.lat, r.geometry.location.lng);
                if !coordinates.is_valid() {
                    return Err(ProviderError::Malformed(format!(
                        "coordinates out of range: {}",
                        coordinates
                    )));
                }
                Ok(GeocodeMatch {
                    coordinates,
                    formatted_address: r.formatted_address,
                })
            })
            .collect(),
        "ZERO_RESULTS" => Ok(Vec::new()),
        "OVER_DAILY_LIMIT" => Err(ProviderError::QuotaExceeded(QuotaKind::Daily)),
        "OVER_QUERY_LIMIT" => Err(ProviderError::QuotaExceeded(QuotaKind::PerSecond)),
        other => Err(ProviderError::Rejected {
            status: other.to_string(),
            message: body.error_message.unwrap_or_default(),
        }),
    }
}
