// src/estimate/rules.rs
//
// Per-jurisdiction heuristics. Adding a county means adding a row to
// `COUNTY_RULES`; nothing in the estimator branches on county names.

/// Bedroom count by purchase price. A price strictly below a breakpoint's
/// limit gets that breakpoint's count; prices at or above every limit get `top`.
#[derive(Debug, Clone, Copy)]
pub struct BedroomTiers {
    pub breakpoints: &'static [(f64, i64)],
    pub top: i64,
}

impl BedroomTiers {
    pub fn bedrooms_for(&self, price: f64) -> i64 {
        self.breakpoints
            .iter()
            .find(|(limit, _)| price < *limit)
            .map(|(_, beds)| *beds)
            .unwrap_or(self.top)
    }
}

/// Bathroom count from bedroom count: the first entry whose bedroom ceiling
/// (inclusive) is not exceeded wins, else `otherwise`.
#[derive(Debug, Clone, Copy)]
pub struct BathroomRule {
    pub ceilings: &'static [(i64, f64)],
    pub otherwise: f64,
}

impl BathroomRule {
    pub fn bathrooms_for(&self, bedrooms: i64) -> f64 {
        self.ceilings
            .iter()
            .find(|(max_beds, _)| bedrooms <= *max_beds)
            .map(|(_, baths)| *baths)
            .unwrap_or(self.otherwise)
    }
}

/// `per_bedroom * bedrooms + base`
#[derive(Debug, Clone, Copy)]
pub struct SquareFeetRule {
    pub per_bedroom: i64,
    pub base: i64,
}

impl SquareFeetRule {
    pub fn square_feet_for(&self, bedrooms: i64) -> i64 {
        self.per_bedroom * bedrooms + self.base
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CountyRules {
    pub county: &'static str,
    /// Name used in provenance text, e.g. "LA County".
    pub label: &'static str,
    pub bedrooms: BedroomTiers,
    pub bathrooms: Option<BathroomRule>,
    pub square_feet: Option<SquareFeetRule>,
    pub lot_size_sqft: i64,
    pub lot_size_area: &'static str,
    pub apn_prefix: &'static str,
}

pub const COUNTY_RULES: &[CountyRules] = &[
    CountyRules {
        county: "Los Angeles",
        label: "LA County",
        bedrooms: BedroomTiers {
            breakpoints: &[(400_000.0, 2), (600_000.0, 3), (900_000.0, 4)],
            top: 5,
        },
        bathrooms: Some(BathroomRule {
            ceilings: &[(2, 1.5), (3, 2.0)],
            otherwise: 2.5,
        }),
        square_feet: Some(SquareFeetRule {
            per_bedroom: 950,
            base: 250,
        }),
        lot_size_sqft: 5500,
        lot_size_area: "LA County",
        apn_prefix: "61",
    },
    CountyRules {
        county: "San Bernardino",
        label: "San Bernardino County",
        bedrooms: BedroomTiers {
            breakpoints: &[(350_000.0, 3), (500_000.0, 4)],
            top: 5,
        },
        bathrooms: None,
        square_feet: None,
        lot_size_sqft: 7500,
        lot_size_area: "Victorville area",
        apn_prefix: "04",
    },
    CountyRules {
        county: "Kern",
        label: "Kern County",
        bedrooms: BedroomTiers {
            breakpoints: &[(300_000.0, 3), (400_000.0, 4)],
            top: 5,
        },
        bathrooms: None,
        square_feet: None,
        lot_size_sqft: 6500,
        lot_size_area: "Bakersfield area",
        apn_prefix: "08",
    },
];

/// Typical construction year by city.
pub const CITY_YEAR_BUILT: &[(&str, i64)] = &[
    ("Downey", 1965),
    ("Pico Rivera", 1970),
    ("Bakersfield", 1985),
    ("Victorville", 1995),
];

/// Typical monthly HOA fee by city; cities not listed are assumed to have none.
pub const CITY_HOA_FEE: &[(&str, f64)] = &[("Victorville", 50.0)];

pub fn county_rules(county: &str) -> Option<&'static CountyRules> {
    let county = county.trim();
    COUNTY_RULES.iter().find(|r| r.county == county)
}

pub fn typical_year_built(city: &str) -> Option<i64> {
    let city = city.trim();
    CITY_YEAR_BUILT
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, year)| *year)
}

pub fn typical_hoa_fee(city: &str) -> Option<f64> {
    let city = city.trim();
    CITY_HOA_FEE
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, fee)| *fee)
}
