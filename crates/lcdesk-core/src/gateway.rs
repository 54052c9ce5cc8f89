//! Port to the external document-processing service.

use async_trait::async_trait;

use crate::document::{
    ClassificationPage, Draft, FinalOcrRecord, OcrPage, ReviewRecord, SummaryRecord,
};
use crate::error::Result;
use crate::lifecycle::LifecycleDefinition;
use crate::session::{CustomerRecord, NewSession, Session};
use crate::upload::{FileDocument, PastedDocument, UploadReceipt};

/// The JSON/REST contract of the document-processing service.
///
/// Read operations for per-draft collections degrade to empty results
/// on HTTP 404 (the service reports "nothing yet" that way); every
/// other failure surfaces as a typed error.
#[async_trait]
pub trait ProcessingGateway: Send + Sync {
    // ---- sessions -------------------------------------------------------

    async fn list_sessions(&self) -> Result<Vec<Session>>;

    async fn create_session(&self, payload: &NewSession) -> Result<Session>;

    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Creates the customer record linked to a freshly created session.
    /// Not atomic with `create_session`; see the session store.
    async fn save_customer(&self, customer: &CustomerRecord) -> Result<()>;

    /// Pre-fill lookup by CIF number and/or customer id.
    async fn get_customer(
        &self,
        cif_number: Option<&str>,
        customer_id: Option<&str>,
    ) -> Result<Option<CustomerRecord>>;

    // ---- lifecycles -----------------------------------------------------

    async fn list_lifecycles(&self) -> Result<Vec<LifecycleDefinition>>;

    // ---- uploads --------------------------------------------------------

    /// Submits one file to the multipart bulk endpoint.
    async fn upload_file(
        &self,
        session_id: &str,
        product: &str,
        document: &FileDocument,
    ) -> Result<Vec<UploadReceipt>>;

    /// Submits one pasted document to the text-ingestion endpoint.
    async fn upload_text(
        &self,
        session_id: &str,
        product: &str,
        document: &PastedDocument,
    ) -> Result<UploadReceipt>;

    // ---- per-draft stage reads ------------------------------------------

    async fn drafts(&self, session_id: &str) -> Result<Vec<Draft>>;

    async fn ocr_pages(&self, doc_id: &str) -> Result<Vec<OcrPage>>;

    async fn classification_pages(&self, doc_id: &str) -> Result<Vec<ClassificationPage>>;

    async fn final_ocr(&self, doc_id: &str) -> Result<Vec<FinalOcrRecord>>;

    async fn summary(&self, doc_id: &str) -> Result<Option<SummaryRecord>>;

    // ---- review ---------------------------------------------------------

    async fn review_record(&self, doc_id: &str) -> Result<Option<ReviewRecord>>;

    /// Persists the entire edited `documents_json` blob for a document,
    /// tagged with the reviewer identity.
    async fn save_review(&self, doc_id: &str, documents_json: &str, user: &str) -> Result<()>;

    /// One-way approval of the document's assembled content.
    async fn approve(&self, doc_id: &str, user: &str) -> Result<()>;
}
