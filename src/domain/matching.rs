//! Farmer/buyer directory used by the matching operation.

use crate::domain::reply::lenient_f64;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MatchProfile {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub millet_type: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub quantity: f64,
    pub location: String,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

fn profile(id: &str, name: &str, kind: &str, millet: &str, qty: f64, location: &str) -> MatchProfile {
    MatchProfile {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        millet_type: millet.to_string(),
        quantity: qty,
        location: location.to_string(),
        distance_km: None,
    }
}

pub fn farmers() -> Vec<MatchProfile> {
    vec![
        profile("f1", "Ramesh Kumar", "farmer", "Pearl Millet", 100.0, "Rajasthan"),
        profile("f2", "Suresh Singh", "farmer", "Sorghum", 500.0, "Maharashtra"),
        profile("f3", "Anita Devi", "farmer", "Finger Millet", 200.0, "Karnataka"),
        profile("f4", "Rajesh Gupta", "farmer", "Foxtail Millet", 150.0, "Andhra Pradesh"),
        profile("f5", "Vikram Singh", "farmer", "Pearl Millet", 300.0, "Gujarat"),
    ]
}

pub fn buyers() -> Vec<MatchProfile> {
    vec![
        profile("b1", "Millet Foods Ltd", "buyer", "Pearl Millet", 1000.0, "Delhi"),
        profile("b2", "Healthy Grains", "buyer", "Finger Millet", 150.0, "Bangalore"),
    ]
}

/// Counterparts for a requester: farmers look for buyers, everyone else for farmers.
pub fn counterparts_for(user_type: &str) -> Vec<MatchProfile> {
    if user_type.trim().eq_ignore_ascii_case("farmer") {
        buyers()
    } else {
        farmers()
    }
}

/// Offline fallback: candidates whose commodity mentions the requested one.
pub fn filter_by_commodity(candidates: Vec<MatchProfile>, millet_type: &str) -> Vec<MatchProfile> {
    let wanted = millet_type.trim().to_lowercase();
    candidates
        .into_iter()
        .filter(|c| c.millet_type.to_lowercase().contains(&wanted))
        .collect()
}
