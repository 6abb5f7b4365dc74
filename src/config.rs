// config.rs
use crate::errors::EnrichError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "RealEstateCRM/1.0";

/// Where the record store lives. The core only ever reads from it.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    /// Comma-separated ISO country codes passed to the service.
    pub country_codes: String,
    /// Sleep paid before every request, whatever its outcome.
    pub min_interval: Duration,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_codes: "us".to_string(),
            min_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Everything one enrichment run needs, resolved up front by the caller.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub store: StoreConfig,
    pub batch_size: usize,
    pub output_dir: PathBuf,
    pub estimate_hoa_fee: bool,
    pub geocoder: GeocoderConfig,
}

impl EnrichConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig {
                path: db_path.into(),
            },
            batch_size: DEFAULT_BATCH_SIZE,
            output_dir: PathBuf::from("."),
            estimate_hoa_fee: false,
            geocoder: GeocoderConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), EnrichError> {
        if self.batch_size == 0 {
            return Err(EnrichError::Config("batch size must be at least 1".into()));
        }

        let endpoint = Url::parse(&self.geocoder.endpoint).map_err(|e| {
            EnrichError::Config(format!(
                "geocoder endpoint '{}' is not a valid URL: {e}",
                self.geocoder.endpoint
            ))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(EnrichError::Config(format!(
                "geocoder endpoint must be http(s), got '{}'",
                endpoint.scheme()
            )));
        }

        if self.geocoder.user_agent.trim().is_empty() {
            return Err(EnrichError::Config("geocoder user agent is empty".into()));
        }

        Ok(())
    }
}
