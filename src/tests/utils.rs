use crate::db::{init_db, Database};
use crate::domain::{Address, PropertyRecord};
use crate::geocode::{CoordinateResolver, Coordinates};
use rusqlite::params;
use std::cell::RefCell;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Fresh store in `dir` using the production schema.
pub fn init_test_db(dir: &tempfile::TempDir) -> Database {
    let db = Database::new(dir.path().join("escrows.sqlite3"));
    init_db(&db, "sql/schema.sql").unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

pub fn insert_escrow(db: &Database, rec: &PropertyRecord, created_at: &str) {
    db.with_writable_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO escrows (
                id, display_id, property_address, city, state, zip_code, county,
                purchase_price, property_type, bedrooms, bathrooms, square_feet,
                lot_size_sqft, year_built, latitude, longitude, apn, mls_number,
                hoa_fee, subdivision, view_type, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                      ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)
            "#,
            params![
                rec.id,
                rec.display_id,
                rec.address.street,
                rec.address.city,
                rec.address.state,
                rec.address.zip,
                rec.address.county,
                rec.purchase_price,
                rec.property_type,
                rec.bedrooms,
                rec.bathrooms,
                rec.square_feet,
                rec.lot_size_sqft,
                rec.year_built,
                rec.latitude,
                rec.longitude,
                rec.apn,
                rec.mls_number,
                rec.hoa_fee,
                rec.subdivision,
                rec.view_type,
                created_at,
            ],
        )?;
        Ok(())
    })
    .expect("insert escrow");
}

/// Escrow with an address and price but none of the tracked fields.
pub fn bare_escrow(id: &str, street: &str, city: &str, county: &str, price: f64) -> PropertyRecord {
    PropertyRecord {
        id: id.to_string(),
        display_id: Some(format!("ESC-{id}")),
        address: Address {
            street: street.to_string(),
            city: Some(city.to_string()),
            state: Some("CA".to_string()),
            zip: Some("90241".to_string()),
            county: Some(county.to_string()),
        },
        purchase_price: Some(price),
        property_type: Some("Single Family".to_string()),
        ..Default::default()
    }
}

pub fn complete_escrow(id: &str, street: &str) -> PropertyRecord {
    PropertyRecord {
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        square_feet: Some(1650),
        lot_size_sqft: Some(5200),
        year_built: Some(1958),
        latitude: Some(33.9401),
        longitude: Some(-118.1332),
        apn: Some("6245-017-033".to_string()),
        ..bare_escrow(id, street, "Downey", "Los Angeles", 640_000.0)
    }
}

/// Resolver that answers every lookup the same way and remembers the queries.
pub struct StubResolver {
    answer: Option<Coordinates>,
    pub calls: RefCell<Vec<String>>,
}

impl StubResolver {
    pub fn answering(latitude: f64, longitude: f64) -> Self {
        Self {
            answer: Some(Coordinates {
                latitude,
                longitude,
            }),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl CoordinateResolver for StubResolver {
    fn resolve(&self, address: &Address) -> Option<Coordinates> {
        self.calls.borrow_mut().push(address.one_line());
        self.answer
    }
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a scoped subscriber and returns what it logged.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (out, logs)
}
