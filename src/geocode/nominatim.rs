use super::models::parse_search_response;
use super::{CoordinateResolver, Coordinates, GeocodeError};
use crate::config::GeocoderConfig;
use crate::domain::Address;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Blocking client for a Nominatim-compatible `/search` endpoint.
///
/// Every lookup sleeps `min_interval` first, to stay inside the public
/// instance's one-request-per-second policy. The sleep does not account for
/// the request's own latency, so real spacing is at least the interval.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    country_codes: String,
    min_interval: Duration,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            country_codes: config.country_codes.clone(),
            min_interval: config.min_interval,
        })
    }

    /// One search request, no pacing and no retries.
    pub fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.country_codes.as_str()),
            ])
            .send()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        parse_search_response(&body)
    }
}

impl CoordinateResolver for NominatimGeocoder {
    fn resolve(&self, address: &Address) -> Option<Coordinates> {
        let query = address.one_line();
        info!(%query, "geocoding");

        std::thread::sleep(self.min_interval);

        match self.search(&query) {
            Ok(Some(coords)) => {
                info!(lat = coords.latitude, lon = coords.longitude, "geocoded");
                Some(coords)
            }
            Ok(None) => {
                warn!(%query, "no geocoding results");
                None
            }
            Err(e) => {
                warn!(%query, error = %e, "geocoding error");
                None
            }
        }
    }
}
