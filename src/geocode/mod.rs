mod geocode_error;
mod models;
mod nominatim;

pub use geocode_error::GeocodeError;
pub use nominatim::NominatimGeocoder;

use crate::domain::Address;

/// Provenance recorded for coordinates obtained from the geocoder.
pub const GEOCODER_SOURCE: &str = "OpenStreetMap Nominatim";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Best-effort address to coordinates lookup.
///
/// Implementations swallow their own failures: `None` means "no coordinates
/// available", whatever the reason.
pub trait CoordinateResolver {
    fn resolve(&self, address: &Address) -> Option<Coordinates>;
}
