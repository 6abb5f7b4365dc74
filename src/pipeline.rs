// src/pipeline.rs

use crate::config::EnrichConfig;
use crate::db::{find_by_address, select_needing_data, Database};
use crate::domain::{Enrichment, Field, PropertyRecord};
use crate::emit::{emit, write_artifact, UpdateStatement};
use crate::errors::EnrichError;
use crate::estimate::AttributeEstimator;
use crate::geocode::{CoordinateResolver, GEOCODER_SOURCE};
use chrono::Utc;
use std::path::PathBuf;
use tracing::{info, info_span};

/// Outcome of one run.
#[derive(Debug)]
pub struct RunReport {
    pub records_seen: usize,
    pub statements: Vec<UpdateStatement>,
    pub artifact: PathBuf,
}

/// Drives a batch: select records, fill gaps, collect statements, write the
/// script. Records are processed strictly one after another.
pub struct EnrichmentOrchestrator<R> {
    db: Database,
    resolver: R,
    estimator: AttributeEstimator,
    batch_size: usize,
    output_dir: PathBuf,
}

impl<R: CoordinateResolver> EnrichmentOrchestrator<R> {
    pub fn new(config: &EnrichConfig, resolver: R) -> Result<Self, EnrichError> {
        config.validate()?;

        Ok(Self {
            db: Database::from_config(&config.store),
            resolver,
            estimator: AttributeEstimator::new(config.estimate_hoa_fee),
            batch_size: config.batch_size,
            output_dir: config.output_dir.clone(),
        })
    }

    #[cfg(test)]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The record at `target` (at most one), or the default batch of
    /// incomplete records. The connection is released before returning.
    pub fn select(&self, target: Option<&str>) -> Result<Vec<PropertyRecord>, EnrichError> {
        self.db.with_conn(|conn| match target {
            Some(address) => Ok(find_by_address(conn, address)?.into_iter().collect()),
            None => select_needing_data(conn, self.batch_size),
        })
    }

    /// Coordinates plus estimates for one record, as a statement if anything
    /// was found.
    pub fn enrich_record(&self, record: &PropertyRecord) -> Option<UpdateStatement> {
        let mut enrichment = Enrichment::new();

        if record.needs_coordinates() {
            if let Some(coords) = self.resolver.resolve(&record.address) {
                if record.is_missing(Field::Latitude) {
                    enrichment.insert(Field::Latitude, coords.latitude, GEOCODER_SOURCE);
                }
                if record.is_missing(Field::Longitude) {
                    enrichment.insert(Field::Longitude, coords.longitude, GEOCODER_SOURCE);
                }
            }
        }

        enrichment.merge(self.estimator.estimate(record));

        if enrichment.is_empty() {
            info!(record = record.label(), "no updates needed");
            return None;
        }

        let statement = emit(&record.id, enrichment.updates(), enrichment.provenance())?;
        info!(
            record = record.label(),
            id = statement.record_id(),
            fields = statement.assignments().len(),
            columns = ?statement.assigned_columns(),
            "generated updates"
        );
        Some(statement)
    }

    pub fn run(&self, target: Option<&str>) -> Result<RunReport, EnrichError> {
        match target {
            Some(address) => info!(%address, "processing specific address"),
            None => info!(limit = self.batch_size, "processing batch"),
        }
        info!(store = %self.db.path().display(), "reading escrows");

        let records = self.select(target)?;
        info!(count = records.len(), "found properties needing data");

        let mut statements = Vec::new();
        for record in &records {
            let _span = info_span!("record", id = %record.id).entered();
            info!(
                address = %record.address.one_line(),
                missing = record.missing_fields().len(),
                "processing"
            );

            if let Some(statement) = self.enrich_record(record) {
                statements.push(statement);
            }
        }

        let artifact = write_artifact(&self.output_dir, &statements, Utc::now())?;
        info!(
            statements = statements.len(),
            file = %artifact.display(),
            "SQL updates written"
        );

        Ok(RunReport {
            records_seen: records.len(),
            statements,
            artifact,
        })
    }
}
