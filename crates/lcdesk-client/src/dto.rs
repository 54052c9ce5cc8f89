//! Wire DTOs for the external services.
//!
//! These keep the services' field casing and shape quirks (camelCase
//! session rows, `ID`/`Instrument` lifecycle columns, string-or-number
//! ids, one-or-many collections) and convert to the domain types at
//! this boundary.

use lcdesk_core::lifecycle::LifecycleDefinition;
use lcdesk_core::session::{CustomerRecord, NewSession, Session, SessionStatus};
use serde::{Deserialize, Deserializer, Serialize};

/// Some endpoints return a single object where the client expects a
/// list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// Ids arrive as JSON strings or numbers depending on the backing
/// column; normalize to `String` here.
fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Session row as delivered by `GET /sessions` / `POST /sessions`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionDto {
    #[serde(alias = "sessionID", deserialize_with = "flexible_id")]
    id: String,
    #[serde(default)]
    cif_number: String,
    #[serde(default)]
    lc_number: String,
    #[serde(default)]
    instrument: Option<String>,
    #[serde(default)]
    lifecycle: String,
    #[serde(default)]
    account_name: Option<String>,
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    customer_type: String,
    #[serde(default)]
    customer_id: Option<String>,
    #[serde(default)]
    status: Option<SessionStatus>,
    #[serde(default)]
    created_at: String,
}

impl From<SessionDto> for Session {
    fn from(dto: SessionDto) -> Self {
        Session {
            id: dto.id,
            cif_number: dto.cif_number,
            lc_number: dto.lc_number,
            instrument: dto.instrument,
            lifecycle: dto.lifecycle,
            account_name: dto.account_name,
            customer_name: dto.customer_name,
            customer_type: dto.customer_type,
            customer_id: dto.customer_id,
            status: dto.status.unwrap_or_default(),
            created_at: dto.created_at,
        }
    }
}

/// Body for `POST /sessions`; optional fields serialize as null.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewSessionBody<'a> {
    cif_number: &'a str,
    customer_id: Option<&'a str>,
    customer_name: &'a str,
    account_name: Option<&'a str>,
    customer_type: &'a str,
    lc_number: &'a str,
    instrument: Option<&'a str>,
    lifecycle: &'a str,
}

impl<'a> From<&'a NewSession> for NewSessionBody<'a> {
    fn from(payload: &'a NewSession) -> Self {
        Self {
            cif_number: &payload.cif_number,
            customer_id: payload.customer_id.as_deref(),
            customer_name: &payload.customer_name,
            account_name: payload.account_name.as_deref(),
            customer_type: &payload.customer_type,
            lc_number: &payload.lc_number,
            instrument: payload.instrument.as_deref(),
            lifecycle: &payload.lifecycle,
        }
    }
}

/// Customer record in the service's casing, used both as the
/// `POST /save-customers` body and the `GET /get-customer` response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerDto {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    cif_number: String,
    #[serde(default)]
    customer_id: Option<String>,
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    account_name: Option<String>,
    #[serde(default)]
    customer_type: String,
    #[serde(default)]
    lc_number: Option<String>,
    #[serde(default)]
    instrument: Option<String>,
    #[serde(default)]
    lifecycle: Option<String>,
}

impl From<CustomerDto> for CustomerRecord {
    fn from(dto: CustomerDto) -> Self {
        CustomerRecord {
            session_id: dto.session_id,
            cif_number: dto.cif_number,
            customer_id: dto.customer_id,
            customer_name: dto.customer_name,
            account_name: dto.account_name,
            customer_type: dto.customer_type,
            lc_number: dto.lc_number,
            instrument: dto.instrument,
            lifecycle: dto.lifecycle,
        }
    }
}

impl From<&CustomerRecord> for CustomerDto {
    fn from(record: &CustomerRecord) -> Self {
        CustomerDto {
            session_id: record.session_id.clone(),
            cif_number: record.cif_number.clone(),
            customer_id: record.customer_id.clone(),
            customer_name: record.customer_name.clone(),
            account_name: record.account_name.clone(),
            customer_type: record.customer_type.clone(),
            lc_number: record.lc_number.clone(),
            instrument: record.instrument.clone(),
            lifecycle: record.lifecycle.clone(),
        }
    }
}

/// Lifecycle row with the service's column names;
/// `Applicable_Documents` is a comma-separated list.
#[derive(Debug, Deserialize)]
pub(crate) struct LifecycleDto {
    #[serde(rename = "ID", deserialize_with = "flexible_id")]
    id: String,
    #[serde(rename = "Instrument", default)]
    instrument: String,
    #[serde(rename = "Transition", default)]
    transition: String,
    #[serde(rename = "Applicable_Documents", default)]
    applicable_documents: Option<String>,
}

impl From<LifecycleDto> for LifecycleDefinition {
    fn from(dto: LifecycleDto) -> Self {
        LifecycleDefinition {
            id: dto.id,
            instrument: dto.instrument,
            transition: dto.transition,
            required_documents: dto
                .applicable_documents
                .as_deref()
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Body for `POST /upload-text-json`.
#[derive(Debug, Serialize)]
pub(crate) struct TextUploadBody<'a> {
    pub session_id: &'a str,
    pub product: &'a str,
    pub document_name: &'a str,
    pub content: &'a str,
}

/// Response of `POST /upload-bulk`.
#[derive(Debug, Deserialize)]
pub(crate) struct BulkUploadResponse {
    pub case_id: String,
    #[serde(default)]
    pub documents: Vec<BulkDocumentDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDocumentDto {
    pub doc_id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub status: String,
}

/// Response of `POST /upload-text-json`.
#[derive(Debug, Deserialize)]
pub(crate) struct TextUploadResponse {
    pub case_id: String,
    pub doc_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub source: String,
}

/// Body for `PUT /review/{doc_id}`.
#[derive(Debug, Serialize)]
pub(crate) struct ReviewSaveBody<'a> {
    pub documents_json: &'a str,
    pub user: &'a str,
}

/// Envelope of the vessel-tracking response.
#[derive(Debug, Deserialize)]
pub(crate) struct VesselEnvelope {
    #[serde(default)]
    pub data: Option<lcdesk_core::vessel::VesselPosition>,
    #[serde(default)]
    pub message: Option<String>,
}
