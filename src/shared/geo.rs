//! Great-circle distance between coordinates.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};

/// Mean Earth radius in kilometers (IUGG)
const EARTH_RADIUS_KM: f64 = 6_371.0088;

/// A validated latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns `None` unless both values are finite and within range
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Build from nullable database columns; both must be present and valid
    pub fn from_columns(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            _ => None,
        }
    }

    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(self, other)
    }
}

/// Haversine distance in kilometers
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Parse an optional lat/lon pair from request input
pub fn parse_location(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<Coordinates>> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Coordinates::new(lat, lon).map(Some).ok_or_else(|| {
            AppError::Validation(
                "Latitude must be within [-90, 90] and longitude within [-180, 180]".to_string(),
            )
        }),
        (None, None) => Ok(None),
        _ => Err(AppError::Validation(
            "Latitude and longitude must be provided together".to_string(),
        )),
    }
}
