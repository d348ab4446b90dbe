//! Hospital price comparison: detected codes → ranked offerings.

use std::cmp::Ordering;

use rusqlite::Connection;

use crate::db::{query_hospitals_for_treatment, DatabaseError};
use crate::geo::{haversine_km, round_km};
use crate::models::{ComparisonRow, HospitalOffering, UserLocation};

/// Source of hospital offerings per treatment code.
pub trait OfferingSource {
    fn offerings_for(&self, treatment_code: &str) -> Result<Vec<HospitalOffering>, DatabaseError>;
}

impl OfferingSource for Connection {
    fn offerings_for(&self, treatment_code: &str) -> Result<Vec<HospitalOffering>, DatabaseError> {
        query_hospitals_for_treatment(self, treatment_code)
    }
}

/// Build comparison rows for every offering of every code, then rank them.
///
/// Distance is only computed when `location` is given. Codes without
/// offerings contribute nothing.
pub fn rank_comparisons(
    codes: &[String],
    location: Option<UserLocation>,
    source: &impl OfferingSource,
) -> Result<Vec<ComparisonRow>, DatabaseError> {
    let mut rows = Vec::new();

    for code in codes {
        let offerings = source.offerings_for(code)?;
        tracing::debug!(code = %code, offerings = offerings.len(), "Offerings fetched");

        rows.extend(offerings.into_iter().map(|offering| {
            let distance_km = location
                .map(|user| round_km(haversine_km(user.lat, user.lon, offering.lat, offering.lon)));
            ComparisonRow {
                hospital_id: offering.id,
                hospital_name: offering.name,
                treatment_code: code.clone(),
                treatment_name: offering.treatment_name,
                price: offering.price,
                lat: offering.lat,
                lon: offering.lon,
                distance_km,
            }
        }));
    }

    sort_rows(&mut rows);
    Ok(rows)
}

/// Stable sort: price ascending, then distance ascending with rows lacking
/// a distance after every row that has one.
pub fn sort_rows(rows: &mut [ComparisonRow]) {
    rows.sort_by(|a, b| {
        a.price
            .total_cmp(&b.price)
            .then_with(|| compare_distance(a.distance_km, b.distance_km))
    });
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use std::collections::HashMap;

    /// In-memory offerings keyed by code.
    struct FixedSource(HashMap<&'static str, Vec<HospitalOffering>>);

    impl OfferingSource for FixedSource {
        fn offerings_for(&self, code: &str) -> Result<Vec<HospitalOffering>, DatabaseError> {
            Ok(self.0.get(code).cloned().unwrap_or_default())
        }
    }

    fn offering(id: i64, price: f64, lat: f64, lon: f64) -> HospitalOffering {
        HospitalOffering {
            id,
            name: format!("Hospital {id}"),
            lat,
            lon,
            price,
            treatment_name: "Test".into(),
        }
    }

    fn row(id: i64, price: f64, distance_km: Option<f64>) -> ComparisonRow {
        ComparisonRow {
            hospital_id: id,
            hospital_name: format!("Hospital {id}"),
            treatment_code: "TEST".into(),
            treatment_name: "Test".into(),
            price,
            lat: 0.0,
            lon: 0.0,
            distance_km,
        }
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn ids(rows: &[ComparisonRow]) -> Vec<i64> {
        rows.iter().map(|r| r.hospital_id).collect()
    }

    #[test]
    fn cataract_sorted_by_price_without_location() {
        let conn = open_memory_database().unwrap();
        let rows = rank_comparisons(&codes(&["CATARACT_SURGERY"]), None, &conn).unwrap();

        assert_eq!(ids(&rows), vec![3, 1, 4]);
        let prices: Vec<f64> = rows.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![22000.0, 25000.0, 30000.0]);
        assert!(rows.iter().all(|r| r.distance_km.is_none()));
        assert!(rows.iter().all(|r| r.treatment_code == "CATARACT_SURGERY"));
    }

    #[test]
    fn location_at_hospital_gives_zero_distance() {
        let conn = open_memory_database().unwrap();
        let here = UserLocation { lat: 17.4410, lon: 78.4550 };
        let rows = rank_comparisons(&codes(&["MRI_BRAIN"]), Some(here), &conn).unwrap();

        assert_eq!(ids(&rows), vec![2, 1, 3]);
        assert_eq!(rows[0].distance_km, Some(0.0));
        assert!(rows.iter().all(|r| r.distance_km.is_some()));
    }

    #[test]
    fn unknown_codes_produce_no_rows() {
        let conn = open_memory_database().unwrap();
        let rows = rank_comparisons(&codes(&["CT_SCAN", "MRI_GENERIC"]), None, &conn).unwrap();
        assert!(rows.is_empty());
        assert!(rank_comparisons(&[], None, &conn).unwrap().is_empty());
    }

    #[test]
    fn rows_from_several_codes_are_merged() {
        let conn = open_memory_database().unwrap();
        let rows =
            rank_comparisons(&codes(&["CATARACT_SURGERY", "DIALYSIS_SESSION"]), None, &conn)
                .unwrap();
        assert_eq!(rows.len(), 6);
        // dialysis sessions are cheapest
        assert_eq!(rows[0].treatment_code, "DIALYSIS_SESSION");
        assert_eq!(rows[0].price, 2000.0);
        assert!(rows.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn equal_price_ordered_by_distance() {
        let source = FixedSource(HashMap::from([(
            "TEST",
            vec![
                offering(1, 100.0, 10.0, 10.0),
                offering(2, 100.0, 0.0, 0.0),
                offering(3, 50.0, 20.0, 20.0),
            ],
        )]));
        let here = UserLocation { lat: 0.0, lon: 0.0 };
        let rows = rank_comparisons(&codes(&["TEST"]), Some(here), &source).unwrap();
        assert_eq!(ids(&rows), vec![3, 2, 1]);
    }

    #[test]
    fn missing_distance_sorts_last_within_price() {
        let mut rows = vec![
            row(1, 100.0, None),
            row(2, 100.0, Some(5000.0)),
            row(3, 100.0, Some(1.0)),
            row(4, 50.0, None),
        ];
        sort_rows(&mut rows);
        assert_eq!(ids(&rows), vec![4, 3, 2, 1]);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let mut rows = vec![
            row(7, 10.0, None),
            row(3, 10.0, Some(2.0)),
            row(5, 10.0, None),
            row(1, 10.0, Some(2.0)),
            row(9, 10.0, None),
        ];
        sort_rows(&mut rows);
        assert_eq!(ids(&rows), vec![3, 1, 7, 5, 9]);
    }

    #[test]
    fn same_hospital_under_two_codes_appears_twice() {
        let source = FixedSource(HashMap::from([
            ("A", vec![offering(1, 10.0, 0.0, 0.0)]),
            ("B", vec![offering(1, 10.0, 0.0, 0.0)]),
        ]));
        let rows = rank_comparisons(&codes(&["B", "A"]), None, &source).unwrap();
        let codes: Vec<&str> = rows.iter().map(|r| r.treatment_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A"]);
    }
}
