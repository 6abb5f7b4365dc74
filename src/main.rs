use crate::config::{EnrichConfig, DEFAULT_BATCH_SIZE, DEFAULT_USER_AGENT, NOMINATIM_SEARCH_URL};
use crate::db::{bootstrap_db, Database};
use crate::errors::EnrichError;
use crate::geocode::NominatimGeocoder;
use crate::pipeline::{EnrichmentOrchestrator, RunReport};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod emit;
mod errors;
mod estimate;
mod geocode;
mod pipeline;

#[cfg(test)]
mod tests;

/// Fill in missing escrow property data and write the changes as a
/// reviewable SQL script. The store itself is never modified.
#[derive(Parser, Debug)]
#[command(name = "escrow-enrich", version)]
struct Cli {
    /// Only process the escrow with exactly this street address
    address: Option<String>,

    /// SQLite database holding the escrows table
    #[arg(long, env = "ENRICH_DB_PATH", default_value = "real_estate_crm.sqlite3")]
    db: PathBuf,

    /// Maximum number of escrows per run
    #[arg(long, env = "ENRICH_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    limit: usize,

    /// Directory the SQL script is written to
    #[arg(long, env = "ENRICH_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Create a new local store from this schema file before running.
    /// Refused if the --db file already exists; an existing store is never written
    #[arg(long, env = "ENRICH_SCHEMA", value_name = "PATH")]
    schema: Option<PathBuf>,

    /// Also estimate missing HOA fees
    #[arg(long, env = "ENRICH_HOA_FEES")]
    estimate_hoa_fee: bool,

    /// Nominatim-compatible search endpoint
    #[arg(long, env = "ENRICH_GEOCODER_URL", default_value = NOMINATIM_SEARCH_URL)]
    geocoder_url: String,

    /// User-Agent sent to the geocoder, as its usage policy requires
    #[arg(long, env = "ENRICH_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

impl Cli {
    fn to_config(&self) -> EnrichConfig {
        let mut config = EnrichConfig::new(self.db.clone());
        config.batch_size = self.limit;
        config.output_dir = self.output_dir.clone();
        config.estimate_hoa_fee = self.estimate_hoa_fee;
        config.geocoder.endpoint = self.geocoder_url.clone();
        config.geocoder.user_agent = self.user_agent.clone();
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            info!(
                records = report.records_seen,
                statements = report.statements.len(),
                file = %report.artifact.display(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "enrichment run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunReport, EnrichError> {
    let config = cli.to_config();
    config.validate()?;

    if let Some(schema) = &cli.schema {
        bootstrap_db(&Database::from_config(&config.store), schema)?;
    }

    let geocoder = NominatimGeocoder::new(&config.geocoder)
        .map_err(|e| EnrichError::Config(format!("cannot build geocoder client: {e}")))?;

    let orchestrator = EnrichmentOrchestrator::new(&config, geocoder)?;
    orchestrator.run(cli.address.as_deref())
}
