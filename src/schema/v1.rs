use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub status: String,
    /// Percentage on a 0-100 scale, one decimal place.
    pub probability: f64,
    pub threshold: f64,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesResponse {
    pub features: Vec<String>,
    pub aliases: BTreeMap<String, String>,
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
