//! Upload batch types.
//!
//! Documents reach a session through one of two mutually exclusive
//! modes: file upload (PDF or plain text) or pasted text. Either way,
//! one document is the main document and the rest are supporting.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File extensions accepted in file mode.
const ACCEPTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// A file-mode document: raw bytes plus the original file name.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDocument {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FileDocument {
    /// Creates a file document, rejecting unsupported extensions.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedFileType` for anything other than
    /// `.pdf` or `.txt` (case-insensitive).
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let accepted = Path::new(&file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);

        if !accepted {
            return Err(Error::UnsupportedFileType { file_name });
        }
        Ok(Self { file_name, content })
    }

    /// Reads a file document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| Error::UnsupportedFileType {
                file_name: path.display().to_string(),
            })?;
        let content = std::fs::read(path)?;
        Self::new(file_name, content)
    }
}

/// A copy-paste-mode document: a named text body, no binary payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PastedDocument {
    pub name: String,
    pub content: String,
}

impl PastedDocument {
    /// Blank pairs are skipped rather than submitted.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() || self.content.trim().is_empty()
    }

    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            content: self.content.trim().to_string(),
        }
    }
}

/// The documents collected for one submission, in one of the two modes.
///
/// The main document, when present, is always submitted first;
/// supporting documents follow in selection order.
#[derive(Debug, Clone)]
pub enum UploadBatch {
    Files {
        main: Option<FileDocument>,
        supporting: Vec<FileDocument>,
    },
    Pasted {
        main: Option<PastedDocument>,
        supporting: Vec<PastedDocument>,
    },
}

impl UploadBatch {
    /// Whether the batch holds nothing submittable (blank pasted pairs
    /// do not count).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Files { main, supporting } => main.is_none() && supporting.is_empty(),
            Self::Pasted { main, supporting } => {
                main.as_ref().map(|d| d.is_blank()).unwrap_or(true)
                    && supporting.iter().all(|d| d.is_blank())
            }
        }
    }
}

/// The external service's acknowledgement of one accepted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub case_id: String,
    pub doc_id: String,
    pub document_name: String,
    pub status: String,
}

/// The result of a fully successful batch submission.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Locally generated id correlating this batch in the logs.
    pub batch_id: uuid::Uuid,
    pub receipts: Vec<UploadReceipt>,
}
