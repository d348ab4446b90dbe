use serde::{Deserialize, Serialize};

/// One row of the hospital/offering join for a single treatment code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalOffering {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub price: f64,
    pub treatment_name: String,
}
