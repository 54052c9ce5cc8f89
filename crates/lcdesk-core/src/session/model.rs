//! Session domain model.
//!
//! A session tracks one LC (letter-of-credit) transaction from creation
//! through document upload, review, and finalization. The external
//! processing service is the system of record; these are the client-side
//! copies the workflow operates on.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle status of a session, used for filtering and to gate
/// deletion (`completed` sessions cannot be deleted).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionStatus {
    #[default]
    Created,
    Uploading,
    Processing,
    Reviewing,
    Completed,
    Frozen,
}

impl SessionStatus {
    /// Whether a session in this status may be deleted.
    pub fn is_deletable(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// One LC transaction under review.
///
/// `id` is an opaque, server-assigned string. Timestamps stay in the
/// ISO-8601 string form the service delivers them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Server-assigned session identifier
    pub id: String,
    pub cif_number: String,
    pub lc_number: String,
    #[serde(default)]
    pub instrument: Option<String>,
    /// Transition name scoped to the instrument (e.g. "Issuance")
    pub lifecycle: String,
    #[serde(default)]
    pub account_name: Option<String>,
    pub customer_name: String,
    pub customer_type: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub created_at: String,
}

/// Fields for creating a new session.
///
/// `cif_number`, `customer_name`, `customer_type`, `lc_number`, and
/// `lifecycle` are required; the rest are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub cif_number: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub account_name: Option<String>,
    pub customer_type: String,
    pub lc_number: String,
    #[serde(default)]
    pub instrument: Option<String>,
    pub lifecycle: String,
}

impl NewSession {
    /// Returns a copy with all fields trimmed; blank optional fields
    /// become `None`.
    pub fn trimmed(&self) -> Self {
        fn opt(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        }

        Self {
            cif_number: self.cif_number.trim().to_string(),
            customer_id: opt(&self.customer_id),
            customer_name: self.customer_name.trim().to_string(),
            account_name: opt(&self.account_name),
            customer_type: self.customer_type.trim().to_string(),
            lc_number: self.lc_number.trim().to_string(),
            instrument: opt(&self.instrument),
            lifecycle: self.lifecycle.trim().to_string(),
        }
    }

    /// Checks that every required field is non-blank.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingFields` naming every blank required field.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("cifNumber", &self.cif_number),
            ("customerName", &self.customer_name),
            ("customerType", &self.customer_type),
            ("lcNumber", &self.lc_number),
            ("lifecycle", &self.lifecycle),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::missing_fields(missing))
        }
    }
}

/// The customer record linked to a session via a second, non-atomic
/// call after session creation; also used to pre-fill the creation form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(default)]
    pub session_id: Option<String>,
    pub cif_number: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub account_name: Option<String>,
    pub customer_type: String,
    #[serde(default)]
    pub lc_number: Option<String>,
    #[serde(default)]
    pub instrument: Option<String>,
    #[serde(default)]
    pub lifecycle: Option<String>,
}

impl CustomerRecord {
    /// Builds the customer record submitted right after a session is
    /// created, carrying the new session's id.
    pub fn linked_to(session: &Session, payload: &NewSession) -> Self {
        Self {
            session_id: Some(session.id.clone()),
            cif_number: payload.cif_number.clone(),
            customer_id: payload.customer_id.clone(),
            customer_name: payload.customer_name.clone(),
            account_name: payload.account_name.clone(),
            customer_type: payload.customer_type.clone(),
            lc_number: Some(payload.lc_number.clone()),
            instrument: payload.instrument.clone(),
            lifecycle: Some(payload.lifecycle.clone()),
        }
    }
}
