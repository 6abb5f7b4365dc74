// src/domain/property.rs

use std::fmt;

/// Placeholder the CRM writes into `apn` before a real parcel number is known.
pub const APN_UNSET: &str = "Not set";

/// Postal address of an escrow. Only `street` is guaranteed for selected rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// Single-line form used for geocoding queries and log lines.
    /// Missing components are left out rather than rendered as blanks.
    pub fn one_line(&self) -> String {
        let mut line = self.street.trim().to_string();

        if let Some(city) = non_empty(&self.city) {
            line.push_str(", ");
            line.push_str(city);
        }

        let region = [non_empty(&self.state), non_empty(&self.zip)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if !region.is_empty() {
            line.push_str(", ");
            line.push_str(&region);
        }

        line
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Read-only snapshot of one `escrows` row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRecord {
    pub id: String,
    pub display_id: Option<String>,
    pub address: Address,

    pub purchase_price: Option<f64>,
    pub property_type: Option<String>,

    // Tracked fields
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<f64>,
    pub square_feet: Option<i64>,
    pub lot_size_sqft: Option<i64>,
    pub year_built: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub apn: Option<String>,

    pub mls_number: Option<String>,
    pub hoa_fee: Option<f64>,
    pub subdivision: Option<String>,
    pub view_type: Option<String>,
}

impl PropertyRecord {
    /// Whether `field` has no usable value on the stored row.
    /// An `apn` holding [`APN_UNSET`] counts as missing.
    pub fn is_missing(&self, field: Field) -> bool {
        match field {
            Field::Latitude => self.latitude.is_none(),
            Field::Longitude => self.longitude.is_none(),
            Field::Bedrooms => self.bedrooms.is_none(),
            Field::Bathrooms => self.bathrooms.is_none(),
            Field::SquareFeet => self.square_feet.is_none(),
            Field::LotSizeSqft => self.lot_size_sqft.is_none(),
            Field::YearBuilt => self.year_built.is_none(),
            Field::Apn => match self.apn.as_deref() {
                None => true,
                Some(apn) => apn == APN_UNSET,
            },
            Field::HoaFee => self.hoa_fee.is_none(),
        }
    }

    /// Tracked fields the store has no usable value for.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::TRACKED
            .into_iter()
            .filter(|f| self.is_missing(*f))
            .collect()
    }

    pub fn needs_coordinates(&self) -> bool {
        self.is_missing(Field::Latitude) || self.is_missing(Field::Longitude)
    }

    /// Human-facing name for log lines.
    pub fn label(&self) -> &str {
        self.display_id.as_deref().unwrap_or(&self.id)
    }
}

/// Columns the enrichment run may fill in.
///
/// Declaration order is the order assignments appear in emitted statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Latitude,
    Longitude,
    Bedrooms,
    Bathrooms,
    SquareFeet,
    LotSizeSqft,
    YearBuilt,
    Apn,
    HoaFee,
}

impl Field {
    /// Fields whose absence makes a record a selection candidate.
    pub const TRACKED: [Field; 8] = [
        Field::Bedrooms,
        Field::Bathrooms,
        Field::SquareFeet,
        Field::LotSizeSqft,
        Field::YearBuilt,
        Field::Latitude,
        Field::Longitude,
        Field::Apn,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Bedrooms => "bedrooms",
            Field::Bathrooms => "bathrooms",
            Field::SquareFeet => "square_feet",
            Field::LotSizeSqft => "lot_size_sqft",
            Field::YearBuilt => "year_built",
            Field::Apn => "apn",
            Field::HoaFee => "hoa_fee",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A derived value waiting to be written back.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Real(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}
