mod google_maps_geocoder;

pub use google_maps_geocoder::{GoogleMapsClient, GoogleMapsGeocoder, DEFAULT_BASE_URL};
