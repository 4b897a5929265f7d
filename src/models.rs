use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatSample {
    pub x: String,
    pub y: String,
    pub d: String,
    pub v: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatDocument {
    pub heat: Vec<HeatSample>,
}

/// Body shapes accepted from the heat endpoint: the bare array, or the
/// generator's wrapped document served as-is.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HeatPayload {
    Bare(Vec<HeatSample>),
    Wrapped(HeatDocument),
}

impl HeatPayload {
    pub fn into_samples(self) -> Vec<HeatSample> {
        match self {
            HeatPayload::Bare(samples) => samples,
            HeatPayload::Wrapped(doc) => doc.heat,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub started_at: DateTime<Local>,
    pub current_time: DateTime<Local>,
    pub refreshed_at: Option<DateTime<Local>>,
    pub revision: u64,
    pub sample_count: Option<usize>,
}
