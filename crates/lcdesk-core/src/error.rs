//! Error types for the LCDesk workflow core.

use thiserror::Error;

/// A shared error type for the LCDesk crates.
///
/// Validation variants are raised before any network call is issued;
/// the multi-step variants (`CustomerLink`, `UploadAborted`) report a
/// partial failure whose earlier steps are not rolled back.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// One or more required fields were blank on session creation
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// An upload batch contained no documents
    #[error("No documents to upload")]
    EmptyUpload,

    /// A file outside the accepted types was offered for upload
    #[error("Unsupported file type: '{file_name}' (only .pdf and .txt are accepted)")]
    UnsupportedFileType { file_name: String },

    /// An operation that needs a selected session was invoked without one
    #[error("No session selected")]
    NoSessionSelected,

    /// The MMSI was empty or not a digit string
    #[error("Invalid MMSI: '{input}'")]
    InvalidMmsi { input: String },

    /// Deletion was refused because of the session's status
    #[error("Session '{id}' cannot be deleted (status: {status})")]
    DeleteForbidden { id: String, status: String },

    /// Connection-level failure (refused, timed out, DNS, ...)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The service answered with a non-success status
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The service answered with a payload that could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// The session was created but linking the customer record failed,
    /// leaving an orphaned session the caller must tolerate
    #[error("Session '{session_id}' created but customer link failed: {source}")]
    CustomerLink {
        session_id: String,
        source: Box<Error>,
    },

    /// A multi-document upload failed partway; earlier submissions stay
    #[error(
        "Upload aborted at '{document}' ({submitted} submitted, {remaining} skipped): {source}"
    )]
    UploadAborted {
        document: String,
        submitted: usize,
        remaining: usize,
        source: Box<Error>,
    },

    /// The reviewed artifact is finalized; edits and re-finalizes are refused
    #[error("Document is finalized and can no longer be edited")]
    AlreadyFinalized,

    /// No page matched the requested (document type, page number)
    #[error("Page {page_no} not found under document type '{doc_type}'")]
    PageNotFound { doc_type: String, page_no: u32 },

    /// The requested draft does not belong to the open session
    #[error("Draft not found: '{doc_id}'")]
    DraftNotFound { doc_id: String },

    /// The summary tab is hidden while no finalized content exists
    #[error("No summary available for this session")]
    SummaryHidden,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a MissingFields error from the blank field names.
    pub fn missing_fields(fields: Vec<&str>) -> Self {
        Self::MissingFields {
            fields: fields.into_iter().map(String::from).collect(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a Service error
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for errors raised by client-side validation, before any
    /// network call was issued.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingFields { .. }
                | Self::EmptyUpload
                | Self::UnsupportedFileType { .. }
                | Self::NoSessionSelected
                | Self::InvalidMmsi { .. }
                | Self::DeleteForbidden { .. }
        )
    }

    /// True when the service reported the given HTTP status.
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, Self::Service { status, .. } if *status == code)
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is the AlreadyFinalized error
    pub fn is_already_finalized(&self) -> bool {
        matches!(self, Self::AlreadyFinalized)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
