use crate::domain::{Address, PropertyRecord, APN_UNSET};
use crate::errors::EnrichError;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::warn;

const RECORD_COLUMNS: &str = r#"
    id, display_id, property_address, city, state, zip_code, county,
    purchase_price, property_type, bedrooms, bathrooms, square_feet,
    lot_size_sqft, year_built, latitude, longitude, apn, mls_number,
    hoa_fee, subdivision, view_type
"#;

/// Most recently created escrows that are missing at least one tracked field
/// and have an address to work from.
pub fn select_needing_data(conn: &Connection, limit: usize) -> Result<Vec<PropertyRecord>, EnrichError> {
    let sql = format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM escrows
        WHERE (
            bedrooms IS NULL OR
            bathrooms IS NULL OR
            square_feet IS NULL OR
            lot_size_sqft IS NULL OR
            year_built IS NULL OR
            latitude IS NULL OR
            longitude IS NULL OR
            apn IS NULL OR
            apn = ?1
        )
        AND property_address IS NOT NULL
        ORDER BY created_at DESC
        LIMIT ?2
        "#
    );

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![APN_UNSET, limit], decode_row)?;

    let mut records = Vec::new();
    for r in rows {
        if let Some(record) = keep_decodable(r?) {
            records.push(record);
        }
    }
    Ok(records)
}

/// The escrow whose street address matches exactly, if any.
pub fn find_by_address(conn: &Connection, address: &str) -> Result<Option<PropertyRecord>, EnrichError> {
    let sql = format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM escrows
        WHERE property_address = ?1
        LIMIT 1
        "#
    );

    let record = conn
        .query_row(&sql, params![address], decode_row)
        .optional()?;
    Ok(record.and_then(keep_decodable))
}

/// A row whose values could not be mapped onto [`PropertyRecord`].
struct SkippedRow {
    id: Option<String>,
    error: rusqlite::Error,
}

/// Value-level failures stay with the row; anything else is a store error.
fn decode_row(row: &Row<'_>) -> rusqlite::Result<Result<PropertyRecord, SkippedRow>> {
    match record_from_row(row) {
        Ok(record) => Ok(Ok(record)),
        Err(
            error @ (rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)),
        ) => Ok(Err(SkippedRow {
            id: row.get::<_, String>(0).ok(),
            error,
        })),
        Err(e) => Err(e),
    }
}

fn keep_decodable(decoded: Result<PropertyRecord, SkippedRow>) -> Option<PropertyRecord> {
    match decoded {
        Ok(record) => Some(record),
        Err(skipped) => {
            warn!(
                id = skipped.id.as_deref().unwrap_or("<unknown>"),
                error = %skipped.error,
                "skipping escrow row with undecodable values"
            );
            None
        }
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<PropertyRecord> {
    Ok(PropertyRecord {
        id: row.get(0)?,
        display_id: row.get(1)?,
        address: Address {
            street: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            city: row.get(3)?,
            state: row.get(4)?,
            zip: row.get(5)?,
            county: row.get(6)?,
        },
        purchase_price: row.get(7)?,
        property_type: row.get(8)?,
        bedrooms: row.get(9)?,
        bathrooms: row.get(10)?,
        square_feet: row.get(11)?,
        lot_size_sqft: row.get(12)?,
        year_built: row.get(13)?,
        latitude: row.get(14)?,
        longitude: row.get(15)?,
        apn: row.get(16)?,
        mls_number: row.get(17)?,
        hoa_fee: row.get(18)?,
        subdivision: row.get(19)?,
        view_type: row.get(20)?,
    })
}
