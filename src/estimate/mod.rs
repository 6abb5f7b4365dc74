// src/estimate/mod.rs

pub mod parcel;
pub mod rules;

use crate::domain::{Enrichment, Field, PropertyRecord};
use rules::CountyRules;
use tracing::debug;

/// Bedroom count assumed for derivations when none is stored or estimated.
const DEFAULT_BEDROOMS: i64 = 3;

/// Rule-based fill-in for missing escrow attributes.
///
/// Pure over the record: no I/O, and the same input always yields the same
/// [`Enrichment`]. Only fields that are missing on the record are ever
/// produced, and each one carries a provenance note.
#[derive(Debug, Clone, Default)]
pub struct AttributeEstimator {
    estimate_hoa_fee: bool,
}

impl AttributeEstimator {
    pub fn new(estimate_hoa_fee: bool) -> Self {
        Self { estimate_hoa_fee }
    }

    pub fn estimate(&self, record: &PropertyRecord) -> Enrichment {
        let mut out = Enrichment::new();
        let county = record
            .address
            .county
            .as_deref()
            .and_then(rules::county_rules);

        if let Some(county) = county {
            estimate_structure(record, county, &mut out);
        }

        if record.is_missing(Field::YearBuilt) {
            if let Some(city) = record.address.city.as_deref() {
                if let Some(year) = rules::typical_year_built(city) {
                    out.insert(
                        Field::YearBuilt,
                        year,
                        format!("Typical development period for {}", city.trim()),
                    );
                }
            }
        }

        if record.is_missing(Field::Apn) {
            if let Some(county) = county {
                let apn = parcel::synthesize_apn(
                    county.apn_prefix,
                    &record.address.street,
                    record.address.city.as_deref().unwrap_or(""),
                    &record.id,
                );
                out.insert(Field::Apn, apn, "Generated based on county format");
            }
        }

        if self.estimate_hoa_fee && record.is_missing(Field::HoaFee) {
            let city = record.address.city.as_deref().unwrap_or("").trim();
            match rules::typical_hoa_fee(city) {
                Some(fee) => out.insert(Field::HoaFee, fee, format!("Typical HOA fee for {city}")),
                None => out.insert(Field::HoaFee, 0.0, "Most properties in area have no HOA"),
            }
        }

        debug!(record = record.label(), fields = out.len(), "estimation complete");
        out
    }
}

/// Bedrooms, bathrooms, square footage and lot size for a recognised county.
/// A bedroom count estimated here feeds the later derivations.
fn estimate_structure(record: &PropertyRecord, county: &CountyRules, out: &mut Enrichment) {
    if record.is_missing(Field::Bedrooms) {
        let price = record.purchase_price.unwrap_or(0.0);
        out.insert(
            Field::Bedrooms,
            county.bedrooms.bedrooms_for(price),
            format!("Estimated based on price range for {}", county.label),
        );
    }

    let bedrooms = out
        .get(Field::Bedrooms)
        .and_then(|v| v.as_i64())
        .or(record.bedrooms)
        .unwrap_or(DEFAULT_BEDROOMS);

    if record.is_missing(Field::Bathrooms) {
        if let Some(rule) = county.bathrooms {
            out.insert(
                Field::Bathrooms,
                rule.bathrooms_for(bedrooms),
                "Estimated based on bedroom count",
            );
        }
    }

    if record.is_missing(Field::SquareFeet) {
        if let Some(rule) = county.square_feet {
            out.insert(
                Field::SquareFeet,
                rule.square_feet_for(bedrooms),
                "Estimated based on bedroom count",
            );
        }
    }

    if record.is_missing(Field::LotSizeSqft) {
        out.insert(
            Field::LotSizeSqft,
            county.lot_size_sqft,
            format!("Typical lot size for {}", county.lot_size_area),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, FieldValue, APN_UNSET};

    fn bare(county: &str, city: &str, price: Option<f64>) -> PropertyRecord {
        PropertyRecord {
            id: "abc-123".into(),
            address: Address {
                street: "9602 Cecilia St".into(),
                city: Some(city.into()),
                state: Some("CA".into()),
                zip: Some("90241".into()),
                county: Some(county.into()),
            },
            purchase_price: price,
            ..Default::default()
        }
    }

    fn complete(county: &str, city: &str) -> PropertyRecord {
        PropertyRecord {
            bedrooms: Some(4),
            bathrooms: Some(3.0),
            square_feet: Some(2100),
            lot_size_sqft: Some(6000),
            year_built: Some(2001),
            latitude: Some(33.94),
            longitude: Some(-118.13),
            apn: Some("6255-001-017".into()),
            hoa_fee: Some(120.0),
            ..bare(county, city, Some(750_000.0))
        }
    }

    #[test]
    fn la_record_gets_full_estimate() {
        let e = AttributeEstimator::default().estimate(&bare("Los Angeles", "Downey", Some(550_000.0)));

        assert_eq!(e.get(Field::Bedrooms), Some(&FieldValue::Integer(3)));
        assert_eq!(e.get(Field::Bathrooms), Some(&FieldValue::Real(2.0)));
        assert_eq!(e.get(Field::SquareFeet), Some(&FieldValue::Integer(3100)));
        assert_eq!(e.get(Field::LotSizeSqft), Some(&FieldValue::Integer(5500)));
        assert_eq!(e.get(Field::YearBuilt), Some(&FieldValue::Integer(1965)));
        assert_eq!(e.get(Field::Apn), Some(&FieldValue::Text("6119-965-184".into())));
        assert!(!e.contains(Field::HoaFee));
        assert!(!e.contains(Field::Latitude));

        assert_eq!(
            e.provenance()[&Field::Bedrooms],
            "Estimated based on price range for LA County"
        );
        assert_eq!(e.provenance()[&Field::YearBuilt], "Typical development period for Downey");
    }

    #[test]
    fn bathrooms_follow_the_estimated_bedrooms() {
        let cases = [(350_000.0, 2, 1.5), (450_000.0, 3, 2.0), (700_000.0, 4, 2.5), (1_200_000.0, 5, 2.5)];
        for (price, beds, baths) in cases {
            let e = AttributeEstimator::default().estimate(&bare("Los Angeles", "Downey", Some(price)));
            assert_eq!(e.get(Field::Bedrooms), Some(&FieldValue::Integer(beds)), "price {price}");
            assert_eq!(e.get(Field::Bathrooms), Some(&FieldValue::Real(baths)), "price {price}");
            assert_eq!(
                e.get(Field::SquareFeet),
                Some(&FieldValue::Integer(950 * beds + 250)),
                "price {price}"
            );
        }
    }

    #[test]
    fn stored_bedrooms_drive_derivations() {
        let mut rec = bare("Los Angeles", "Downey", Some(1_000_000.0));
        rec.bedrooms = Some(2);

        let e = AttributeEstimator::default().estimate(&rec);
        assert!(!e.contains(Field::Bedrooms));
        assert_eq!(e.get(Field::Bathrooms), Some(&FieldValue::Real(1.5)));
        assert_eq!(e.get(Field::SquareFeet), Some(&FieldValue::Integer(2150)));
    }

    #[test]
    fn breakpoint_boundaries_split_tiers() {
        let est = AttributeEstimator::default();
        let beds = |price: f64| {
            est.estimate(&bare("Los Angeles", "Downey", Some(price)))
                .get(Field::Bedrooms)
                .cloned()
        };
        assert_eq!(beds(399_999.0), Some(FieldValue::Integer(2)));
        assert_eq!(beds(400_000.0), Some(FieldValue::Integer(3)));
        assert_eq!(beds(599_999.0), Some(FieldValue::Integer(3)));
        assert_eq!(beds(600_000.0), Some(FieldValue::Integer(4)));
        assert_eq!(beds(899_999.0), Some(FieldValue::Integer(4)));
        assert_eq!(beds(900_000.0), Some(FieldValue::Integer(5)));
    }

    #[test]
    fn missing_price_falls_into_lowest_tier() {
        let e = AttributeEstimator::default().estimate(&bare("Kern", "Bakersfield", None));
        assert_eq!(e.get(Field::Bedrooms), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn secondary_counties_skip_bathrooms_and_square_feet() {
        let e = AttributeEstimator::default().estimate(&bare("San Bernardino", "Victorville", Some(420_000.0)));

        assert_eq!(e.get(Field::Bedrooms), Some(&FieldValue::Integer(4)));
        assert_eq!(e.get(Field::LotSizeSqft), Some(&FieldValue::Integer(7500)));
        assert_eq!(e.get(Field::YearBuilt), Some(&FieldValue::Integer(1995)));
        assert_eq!(e.get(Field::Apn), Some(&FieldValue::Text("0419-941-184".into())));
        assert!(!e.contains(Field::Bathrooms));
        assert!(!e.contains(Field::SquareFeet));
        assert_eq!(
            e.provenance()[&Field::LotSizeSqft],
            "Typical lot size for Victorville area"
        );
    }

    #[test]
    fn unknown_county_only_gets_city_year() {
        let e = AttributeEstimator::default().estimate(&bare("Orange", "Downey", Some(800_000.0)));
        assert_eq!(e.len(), 1);
        assert_eq!(e.get(Field::YearBuilt), Some(&FieldValue::Integer(1965)));

        let e = AttributeEstimator::default().estimate(&bare("Orange", "Irvine", Some(800_000.0)));
        assert!(e.is_empty());
    }

    #[test]
    fn present_values_are_never_touched() {
        let est = AttributeEstimator::new(true);
        for (county, city) in [("Los Angeles", "Downey"), ("San Bernardino", "Victorville"), ("Kern", "Bakersfield")] {
            let e = est.estimate(&complete(county, city));
            assert!(e.is_empty(), "{county} produced {:?}", e.updates());
        }
    }

    #[test]
    fn each_missing_field_is_filled_independently() {
        let est = AttributeEstimator::default();
        for field in Field::TRACKED {
            let mut rec = complete("Los Angeles", "Downey");
            match field {
                Field::Bedrooms => rec.bedrooms = None,
                Field::Bathrooms => rec.bathrooms = None,
                Field::SquareFeet => rec.square_feet = None,
                Field::LotSizeSqft => rec.lot_size_sqft = None,
                Field::YearBuilt => rec.year_built = None,
                Field::Apn => rec.apn = None,
                // coordinates come from the geocoder, not the estimator
                Field::Latitude | Field::Longitude | Field::HoaFee => continue,
            }
            let e = est.estimate(&rec);
            let keys: Vec<Field> = e.updates().keys().copied().collect();
            assert_eq!(keys, vec![field]);
        }
    }

    #[test]
    fn sentinel_apn_is_replaced_but_real_apn_is_kept() {
        let est = AttributeEstimator::default();

        let mut rec = complete("Kern", "Bakersfield");
        rec.apn = Some(APN_UNSET.into());
        let e = est.estimate(&rec);
        let apn = match e.get(Field::Apn) {
            Some(FieldValue::Text(apn)) => apn.clone(),
            other => panic!("expected apn, got {other:?}"),
        };
        assert!(apn.starts_with("08"));
        assert_eq!(apn.len(), "0800-000-000".len());
        assert_eq!(e.provenance()[&Field::Apn], "Generated based on county format");

        let mut rec = bare("Orange", "Irvine", None);
        rec.apn = Some(APN_UNSET.into());
        assert!(!est.estimate(&rec).contains(Field::Apn));
    }

    #[test]
    fn provenance_keys_equal_update_keys() {
        let est = AttributeEstimator::new(true);
        let records = [
            bare("Los Angeles", "Pico Rivera", Some(640_000.0)),
            bare("San Bernardino", "Victorville", None),
            bare("Kern", "Bakersfield", Some(310_000.0)),
            bare("Orange", "Irvine", Some(1_000_000.0)),
            complete("Los Angeles", "Downey"),
        ];
        for rec in &records {
            let e = est.estimate(rec);
            assert!(e.updates().keys().eq(e.provenance().keys()));
        }
    }

    #[test]
    fn estimation_is_repeatable() {
        let est = AttributeEstimator::new(true);
        let rec = bare("Los Angeles", "Downey", Some(480_000.0));
        assert_eq!(est.estimate(&rec), est.estimate(&rec));
    }

    #[test]
    fn hoa_fee_is_opt_in() {
        let rec = bare("San Bernardino", "Victorville", Some(300_000.0));
        assert!(!AttributeEstimator::default().estimate(&rec).contains(Field::HoaFee));

        let e = AttributeEstimator::new(true).estimate(&rec);
        assert_eq!(e.get(Field::HoaFee), Some(&FieldValue::Real(50.0)));
        assert_eq!(e.provenance()[&Field::HoaFee], "Typical HOA fee for Victorville");

        let e = AttributeEstimator::new(true).estimate(&bare("Los Angeles", "Downey", None));
        assert_eq!(e.get(Field::HoaFee), Some(&FieldValue::Real(0.0)));
    }
}
