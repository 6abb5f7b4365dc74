use super::{Coordinates, GeocodeError};
use serde::Deserialize;

// Nominatim /search?format=json answers with an array of places:
// [
//   {
//     "place_id": 123,
//     "lat": "33.9401",        <- strings, not numbers
//     "lon": "-118.1332",
//     "display_name": "...",
//     ...
//   }
// ]

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    pub lat: String,
    pub lon: String,
}

/// First hit of a search response, or `None` for an empty result list.
pub fn parse_search_response(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| GeocodeError::JsonParse(e.to_string()))?;

    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let latitude = parse_degrees(&hit.lat, 90.0)?;
    let longitude = parse_degrees(&hit.lon, 180.0)?;

    Ok(Some(Coordinates {
        latitude,
        longitude,
    }))
}

fn parse_degrees(raw: &str, limit: f64) -> Result<f64, GeocodeError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| GeocodeError::InvalidCoordinate(format!("'{raw}' is not a number")))?;

    if !value.is_finite() || value.abs() > limit {
        return Err(GeocodeError::InvalidCoordinate(format!(
            "'{raw}' is outside ±{limit}"
        )));
    }
    Ok(value)
}
