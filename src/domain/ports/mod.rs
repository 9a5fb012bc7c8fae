mod geocoding_client;

pub use geocoding_client::{GeocodingClient, GeocodingClientFactory, ProviderError, QuotaKind};
