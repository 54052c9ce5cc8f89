//! Application configuration.
//!
//! Loaded from `config.toml` under the LCDesk home directory, with
//! every field defaulted so a missing file means a usable local setup.
//! A few fields can be overridden from the environment.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_processing_url() -> String {
    "http://127.0.0.1:8000/api/v1".to_string()
}

fn default_vessel_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_processing_timeout_ms() -> u64 {
    30_000
}

fn default_vessel_timeout_ms() -> u64 {
    10_000
}

/// Product code sent with file-mode uploads.
fn default_file_product() -> String {
    "LC".to_string()
}

/// Product code sent with copy-paste-mode uploads.
fn default_text_product() -> String {
    "trade".to_string()
}

/// Settling delay after a successful upload batch, giving the service's
/// asynchronous processing time to begin before the review view opens.
fn default_settle_ms() -> u64 {
    5_000
}

fn default_reviewer() -> String {
    "reviewer".to_string()
}

/// Connection settings for the document-processing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default = "default_processing_url")]
    pub base_url: String,
    #[serde(default = "default_processing_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_file_product")]
    pub file_product: String,
    #[serde(default = "default_text_product")]
    pub text_product: String,
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            base_url: default_processing_url(),
            timeout_ms: default_processing_timeout_ms(),
            file_product: default_file_product(),
            text_product: default_text_product(),
            settle_ms: default_settle_ms(),
        }
    }
}

/// Connection settings for the vessel-tracking service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselConfig {
    #[serde(default = "default_vessel_url")]
    pub base_url: String,
    #[serde(default = "default_vessel_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            base_url: default_vessel_url(),
            timeout_ms: default_vessel_timeout_ms(),
        }
    }
}

/// Reviewer identity attached to edits and approvals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_reviewer")]
    pub reviewer: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            reviewer: default_reviewer(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub vessel: VesselConfig,
    #[serde(default)]
    pub review: ReviewConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file, falling back to defaults
    /// when the file does not exist, then applies environment
    /// overrides (`LCDESK_PROCESSING_URL`, `LCDESK_VESSEL_URL`,
    /// `LCDESK_REVIEWER`).
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("LCDESK_PROCESSING_URL") {
            self.processing.base_url = url;
        }
        if let Ok(url) = std::env::var("LCDESK_VESSEL_URL") {
            self.vessel.base_url = url;
        }
        if let Ok(reviewer) = std::env::var("LCDESK_REVIEWER") {
            self.review.reviewer = reviewer;
        }
    }
}
