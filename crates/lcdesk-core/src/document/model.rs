//! Stage records for one uploaded document.
//!
//! Each accepted upload becomes a `Draft`, which fans out into ordered
//! collections of page-level records for the OCR, classification, and
//! final-assembly stages, all keyed by `(doc_id, page_no)`.

use serde::{Deserialize, Serialize};

/// Final-OCR status marking a reviewer-approved, locked artifact.
pub const FINAL_OCR_STATUS_APPROVED: &str = "APPROVED";

/// One uploaded document within a session, post-ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub doc_id: String,
    #[serde(default)]
    pub session_id: String,
    pub document_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub processed_at: Option<String>,
}

impl Draft {
    /// The bare file name, with any server-side directory prefix
    /// stripped (the service reports both `/` and `\` separated paths).
    pub fn file_name(&self) -> &str {
        self.file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_path)
    }
}

/// One OCR'd page of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrPage {
    pub doc_id: String,
    pub page_no: u32,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub signature_stamp: Option<String>,
}

/// One classified page of a draft; read-only from the client's view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPage {
    pub doc_id: String,
    pub page_no: u32,
    #[serde(default)]
    pub classified_code: String,
    #[serde(default)]
    pub classified_name: String,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub is_external: Option<bool>,
}

/// The assembled final-OCR record for a draft.
///
/// `documents_json` is the serialized nested mapping from logical
/// document-type name to its page entries; parse it with
/// [`super::AssembledDocuments::parse`] before touching the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalOcrRecord {
    pub doc_id: String,
    #[serde(default)]
    pub page_no: u32,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub whole_text: String,
    #[serde(default)]
    pub documents_json: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub processed_at: Option<String>,
}

impl FinalOcrRecord {
    /// Whether this record has been reviewer-approved and locked.
    pub fn is_approved(&self) -> bool {
        self.status == FINAL_OCR_STATUS_APPROVED
    }
}

/// The approved, immutable summary published when a document is
/// finalized. Same `documents_json` shape as the final-OCR record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub doc_id: String,
    #[serde(default)]
    pub documents_json: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The versioned head of the review store for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub doc_id: String,
    #[serde(default)]
    pub documents_json: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_both_separator_styles() {
        let mut draft = Draft {
            doc_id: "d1".into(),
            session_id: "s1".into(),
            document_name: "Invoice".into(),
            file_path: "/srv/uploads/d1_invoice.pdf".into(),
            processed_at: None,
        };
        assert_eq!(draft.file_name(), "d1_invoice.pdf");

        draft.file_path = r"C:\uploads\d1_invoice.pdf".into();
        assert_eq!(draft.file_name(), "d1_invoice.pdf");
    }

    #[test]
    fn approved_detection_is_exact() {
        let mut record = FinalOcrRecord {
            doc_id: "d1".into(),
            page_no: 1,
            file_path: String::new(),
            whole_text: String::new(),
            documents_json: String::new(),
            status: "PENDING".into(),
            processed_at: None,
        };
        assert!(!record.is_approved());
        record.status = FINAL_OCR_STATUS_APPROVED.into();
        assert!(record.is_approved());
    }
}
