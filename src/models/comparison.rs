use serde::{Deserialize, Serialize};

/// User position in decimal degrees. Both coordinates or none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub lat: f64,
    pub lon: f64,
}

/// A single hospital price for a detected treatment, built per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub hospital_id: i64,
    pub hospital_name: String,
    pub treatment_code: String,
    pub treatment_name: String,
    pub price: f64,
    pub lat: f64,
    pub lon: f64,
    /// Kilometers, rounded to two decimals. `None` without a user location.
    pub distance_km: Option<f64>,
}
