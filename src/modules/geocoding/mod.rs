//! Geocoding module
//!
//! Resolves structured postal addresses to coordinates through Nominatim.
//! Every failure mode (HTTP error, timeout, malformed body, zero results)
//! collapses to "not found"; callers decide whether that is fatal.

mod nominatim_client;

pub use nominatim_client::{Geocoder, NominatimGeocoder, PostalAddress};
