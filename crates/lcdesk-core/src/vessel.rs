//! Vessel position model for the AIS tracking lookup.

use serde::{Deserialize, Serialize};

/// One vessel position report, keyed by MMSI (Maritime Mobile Service
/// Identity). Delivered by the tracking service under a `data`
/// envelope; AIS decoding itself is out of scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselPosition {
    pub mmsi: u64,
    #[serde(default)]
    pub com_state: i64,
    /// AIS navigational status code (0-9)
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub pos_acc: bool,
    #[serde(default)]
    pub raim: bool,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub cog: f64,
    #[serde(default)]
    pub sog: f64,
    #[serde(default)]
    pub rot: f64,
    #[serde(default)]
    pub spare: i64,
    #[serde(default)]
    pub hdt: f64,
    #[serde(default)]
    pub repeat: i64,
    #[serde(default)]
    pub smi: i64,
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub ts: String,
}

impl VesselPosition {
    /// Human-readable navigational status.
    pub fn status_text(&self) -> String {
        nav_status_text(self.status)
    }
}

/// Maps an AIS navigational-status code to its standard text.
pub fn nav_status_text(code: i64) -> String {
    match code {
        0 => "Under way using engine".to_string(),
        1 => "At anchor".to_string(),
        2 => "Not under command".to_string(),
        3 => "Restricted manoeuvrability".to_string(),
        4 => "Constrained by draught".to_string(),
        5 => "Moored".to_string(),
        6 => "Aground".to_string(),
        7 => "Engaged in fishing".to_string(),
        8 => "Under way sailing".to_string(),
        9 => "Reserved".to_string(),
        other => format!("Unknown ({other})"),
    }
}
