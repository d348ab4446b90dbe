//! Hospital price lookups.

use rusqlite::{params, Connection};

use super::DatabaseError;
use crate::models::HospitalOffering;

/// Every hospital offering exactly `treatment_code`, in seed order.
/// Unknown codes yield an empty list.
pub fn query_hospitals_for_treatment(
    conn: &Connection,
    treatment_code: &str,
) -> Result<Vec<HospitalOffering>, DatabaseError> {
    let mut stmt = conn.prepare_cached(
        "SELECT h.id, h.name, h.lat, h.lon, ht.price, ht.treatment_name
         FROM hospital_treatments ht
         JOIN hospitals h ON ht.hospital_id = h.id
         WHERE ht.treatment_code = ?1
         ORDER BY ht.id",
    )?;

    let rows = stmt.query_map(params![treatment_code], |row| {
        Ok(HospitalOffering {
            id: row.get(0)?,
            name: row.get(1)?,
            lat: row.get(2)?,
            lon: row.get(3)?,
            price: row.get(4)?,
            treatment_name: row.get(5)?,
        })
    })?;

    let mut offerings = Vec::new();
    for row in rows {
        offerings.push(row?);
    }
    Ok(offerings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn cataract_offered_by_three_hospitals() {
        let conn = open_memory_database().unwrap();
        let rows = query_hospitals_for_treatment(&conn, "CATARACT_SURGERY").unwrap();

        let summary: Vec<(i64, f64)> = rows.iter().map(|r| (r.id, r.price)).collect();
        assert_eq!(summary, vec![(1, 25000.0), (3, 22000.0), (4, 30000.0)]);
        assert!(rows.iter().all(|r| r.treatment_name == "Cataract Surgery"));
    }

    #[test]
    fn rows_carry_hospital_coordinates() {
        let conn = open_memory_database().unwrap();
        let rows = query_hospitals_for_treatment(&conn, "DIALYSIS_SESSION").unwrap();
        let sai = rows.iter().find(|r| r.id == 2).unwrap();
        assert_eq!(sai.name, "Sri Sai Care Clinic");
        assert_eq!(sai.lat, 17.4410);
        assert_eq!(sai.lon, 78.4550);
        assert_eq!(sai.price, 2000.0);
    }

    #[test]
    fn unknown_code_is_empty() {
        let conn = open_memory_database().unwrap();
        assert!(query_hospitals_for_treatment(&conn, "CT_SCAN").unwrap().is_empty());
        assert!(query_hospitals_for_treatment(&conn, "").unwrap().is_empty());
    }

    #[test]
    fn match_is_exact() {
        let conn = open_memory_database().unwrap();
        assert!(query_hospitals_for_treatment(&conn, "mri_brain").unwrap().is_empty());
        assert!(query_hospitals_for_treatment(&conn, "MRI").unwrap().is_empty());
        assert_eq!(query_hospitals_for_treatment(&conn, "MRI_BRAIN").unwrap().len(), 3);
    }
}
