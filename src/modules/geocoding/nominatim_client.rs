use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::GeocodingConfig;
use crate::core::error::{AppError, Result};
use crate::shared::geo::Coordinates;

/// Structured postal address used for geocoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// Falls back to the configured default country when `None`
    pub country: Option<String>,
}

impl PostalAddress {
    pub fn new(
        street: Option<String>,
        city: Option<String>,
        postal_code: Option<String>,
    ) -> Self {
        Self {
            street,
            city,
            postal_code,
            country: None,
        }
    }

    /// True when no street, city or postal code is given
    pub fn is_empty(&self) -> bool {
        [&self.street, &self.city, &self.postal_code]
            .iter()
            .all(|part| part.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

/// Address-to-coordinates lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best single match, or `None` when the address cannot be located
    async fn resolve(&self, address: &PostalAddress) -> Option<Coordinates>;
}

/// Nominatim search result (only the fields we read)
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Geocoder backed by Nominatim structured search
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    default_country: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_country: config.default_country.clone(),
        })
    }

    /// Structured search URL, limited to the top match
    fn search_url(&self, address: &PostalAddress) -> String {
        let country = address
            .country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(self.default_country.as_str());

        let mut params = vec![
            ("format", "json"),
            ("limit", "1"),
            ("country", country),
        ];

        let parts = [
            ("street", &address.street),
            ("city", &address.city),
            ("postalcode", &address.postal_code),
        ];
        for (key, value) in parts {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((key, v));
            }
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}/search?{}", self.base_url, query_string)
    }

    /// Execute HTTP request to Nominatim; `Err` describes why the lookup failed
    async fn execute_request(&self, url: &str) -> std::result::Result<NominatimResponse, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("returned status {}", response.status()));
        }

        let results: Vec<NominatimResponse> = response
            .json()
            .await
            .map_err(|e| format!("malformed response: {}", e))?;

        results
            .into_iter()
            .next()
            .ok_or_else(|| "no results".to_string())
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, address: &PostalAddress) -> Option<Coordinates> {
        if address.is_empty() {
            return None;
        }

        let url = self.search_url(address);
        tracing::debug!("Geocoding (structured): {:?} -> {}", address, url);

        let result = match self.execute_request(&url).await {
            Ok(result) => result,
            Err(reason) => {
                tracing::warn!("Nominatim lookup for {:?} failed: {}", address, reason);
                return None;
            }
        };

        let coordinates = match (result.lat.parse::<f64>(), result.lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Coordinates::new(lat, lon),
            _ => None,
        };

        match coordinates {
            Some(c) => {
                tracing::debug!(
                    "Geocoded {:?} to ({}, {})",
                    result.display_name.as_deref().unwrap_or("-"),
                    c.latitude,
                    c.longitude
                );
                Some(c)
            }
            None => {
                tracing::warn!(
                    "Nominatim returned unusable coordinates: lat={}, lon={}",
                    result.lat,
                    result.lon
                );
                None
            }
        }
    }
}
