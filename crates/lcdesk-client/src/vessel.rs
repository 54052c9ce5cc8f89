//! Client for the vessel-tracking lookup service.

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use lcdesk_core::config::VesselConfig;
use lcdesk_core::error::{Error, Result};
use lcdesk_core::vessel::VesselPosition;

use crate::dto::VesselEnvelope;
use crate::processing::http_error;

/// Looks up live vessel positions by MMSI.
#[derive(Clone)]
pub struct VesselClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl VesselClient {
    pub fn new(config: &VesselConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Fetches the latest position report for a vessel.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMmsi` before any network call if the
    /// input is empty or not all digits, and `Error::Decode` when the
    /// service answers without a position payload.
    pub async fn position(&self, mmsi: &str) -> Result<VesselPosition> {
        let mmsi = mmsi.trim();
        if mmsi.is_empty() || !mmsi.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidMmsi {
                input: mmsi.to_string(),
            });
        }

        debug!("[VesselClient] looking up MMSI {}", mmsi);
        let response = self
            .client
            .get(format!("{}/vessel/{}", self.base_url, mmsi))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body
            };
            return Err(Error::service(status.as_u16(), message));
        }

        let envelope: VesselEnvelope = response.json().await.map_err(http_error)?;
        envelope.data.ok_or_else(|| {
            Error::decode(
                envelope
                    .message
                    .unwrap_or_else(|| "vessel response had no position data".to_string()),
            )
        })
    }
}
