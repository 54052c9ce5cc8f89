//! In-memory fakes for the use-case tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use lcdesk_core::document::{
    ClassificationPage, Draft, FINAL_OCR_STATUS_APPROVED, FinalOcrRecord, OcrPage, ReviewRecord,
    SummaryRecord,
};
use lcdesk_core::error::{Error, Result};
use lcdesk_core::gateway::ProcessingGateway;
use lcdesk_core::lifecycle::LifecycleDefinition;
use lcdesk_core::session::{CustomerRecord, NewSession, Session, SessionStatus};
use lcdesk_core::snapshot::{RECENT_SESSIONS_LIMIT, SnapshotStore};
use lcdesk_core::upload::{FileDocument, PastedDocument, UploadReceipt};

/// Gateway fake that records every call, allows per-operation failure
/// injection, and can gate individual fetches behind a semaphore to
/// simulate slow responses.
#[derive(Default)]
pub(crate) struct RecordingGateway {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashSet<String>>,
    next_id: AtomicUsize,

    sessions: Mutex<Vec<Session>>,
    customers: Mutex<Vec<CustomerRecord>>,
    lifecycles: Mutex<Vec<LifecycleDefinition>>,
    products: Mutex<Vec<String>>,

    drafts: Mutex<Vec<Draft>>,
    ocr: Mutex<HashMap<String, Vec<OcrPage>>>,
    classification: Mutex<HashMap<String, Vec<ClassificationPage>>>,
    final_ocr: Mutex<HashMap<String, FinalOcrRecord>>,
    reviews: Mutex<HashMap<String, ReviewRecord>>,
    summaries: Mutex<HashMap<String, SummaryRecord>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl RecordingGateway {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Makes the named operation fail. Either the bare operation name
    /// (`"save_review"`) or the recorded form with its argument
    /// (`"upload_file:invoice.pdf"`) matches.
    pub(crate) fn fail_on(&self, op: &str) {
        self.failures.lock().unwrap().insert(op.to_string());
    }

    pub(crate) fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    pub(crate) fn saved_customers(&self) -> Vec<CustomerRecord> {
        self.customers.lock().unwrap().clone()
    }

    pub(crate) fn set_lifecycles(&self, lifecycles: Vec<LifecycleDefinition>) {
        *self.lifecycles.lock().unwrap() = lifecycles;
    }

    pub(crate) fn set_session_status(&self, session_id: &str, status: SessionStatus) {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(session) = sessions.iter_mut().find(|s| s.id == session_id) {
            session.status = status;
        }
    }

    /// Product codes seen across upload calls, in order.
    pub(crate) fn products(&self) -> Vec<String> {
        self.products.lock().unwrap().clone()
    }

    pub(crate) fn add_draft(&self, session_id: &str, doc_id: &str, name: &str) {
        self.drafts.lock().unwrap().push(Draft {
            doc_id: doc_id.to_string(),
            session_id: session_id.to_string(),
            document_name: name.to_string(),
            file_path: format!("/srv/uploads/{doc_id}.pdf"),
            processed_at: None,
        });
    }

    pub(crate) fn set_ocr_page(&self, doc_id: &str, page_no: u32, text: &str) {
        self.ocr
            .lock()
            .unwrap()
            .entry(doc_id.to_string())
            .or_default()
            .push(OcrPage {
                doc_id: doc_id.to_string(),
                page_no,
                extracted_text: text.to_string(),
                signature_stamp: None,
            });
    }

    pub(crate) fn set_final_ocr_blob(&self, doc_id: &str, blob: &str) {
        self.final_ocr.lock().unwrap().insert(
            doc_id.to_string(),
            FinalOcrRecord {
                doc_id: doc_id.to_string(),
                page_no: 1,
                file_path: String::new(),
                whole_text: String::new(),
                documents_json: blob.to_string(),
                status: "PENDING".to_string(),
                processed_at: None,
            },
        );
    }

    /// The blob last saved to the review store for a document.
    pub(crate) fn review_blob(&self, doc_id: &str) -> Option<String> {
        self.reviews
            .lock()
            .unwrap()
            .get(doc_id)
            .map(|r| r.documents_json.clone())
    }

    /// Marks a document approved without going through the gateway, for
    /// "already finalized on the service" fixtures.
    pub(crate) fn approve_directly(&self, doc_id: &str) {
        self.mark_approved(doc_id);
    }

    /// Blocks the OCR fetch for one document until the test releases it
    /// (or, more typically, the fetch is cancelled).
    pub(crate) fn gate_ocr(&self, doc_id: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(doc_id.to_string(), Arc::new(Semaphore::new(0)));
    }

    /// Lets one gated OCR fetch through.
    pub(crate) fn release_ocr(&self, doc_id: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(doc_id) {
            gate.add_permits(1);
        }
    }

    fn record(&self, call: impl Into<String>) -> Result<()> {
        let call = call.into();
        self.calls.lock().unwrap().push(call.clone());
        let failures = self.failures.lock().unwrap();
        let base = call.split(':').next().unwrap_or(&call);
        if failures.contains(&call) || failures.contains(base) {
            return Err(Error::service(500, "injected failure"));
        }
        Ok(())
    }

    fn mark_approved(&self, doc_id: &str) {
        let blob = {
            let mut records = self.final_ocr.lock().unwrap();
            let record = records.get_mut(doc_id);
            if let Some(record) = record {
                record.status = FINAL_OCR_STATUS_APPROVED.to_string();
            }
            self.reviews
                .lock()
                .unwrap()
                .get(doc_id)
                .map(|r| r.documents_json.clone())
                .or_else(|| records.get(doc_id).map(|r| r.documents_json.clone()))
                .unwrap_or_default()
        };
        self.summaries.lock().unwrap().insert(
            doc_id.to_string(),
            SummaryRecord {
                doc_id: doc_id.to_string(),
                documents_json: blob,
                created_at: Some("2024-01-01T00:00:00Z".to_string()),
            },
        );
    }
}

#[async_trait]
impl ProcessingGateway for RecordingGateway {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.record("list_sessions")?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn create_session(&self, payload: &NewSession) -> Result<Session> {
        self.record("create_session")?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let session = Session {
            id: format!("s{n}"),
            cif_number: payload.cif_number.clone(),
            lc_number: payload.lc_number.clone(),
            instrument: payload.instrument.clone(),
            lifecycle: payload.lifecycle.clone(),
            account_name: payload.account_name.clone(),
            customer_name: payload.customer_name.clone(),
            customer_type: payload.customer_type.clone(),
            customer_id: payload.customer_id.clone(),
            status: SessionStatus::Created,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.record("delete_session")?;
        self.sessions.lock().unwrap().retain(|s| s.id != session_id);
        Ok(())
    }

    async fn save_customer(&self, customer: &CustomerRecord) -> Result<()> {
        self.record("save_customer")?;
        self.customers.lock().unwrap().push(customer.clone());
        Ok(())
    }

    async fn get_customer(
        &self,
        cif_number: Option<&str>,
        customer_id: Option<&str>,
    ) -> Result<Option<CustomerRecord>> {
        self.record("get_customer")?;
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| {
                cif_number.is_some_and(|cif| c.cif_number == cif)
                    || customer_id.is_some_and(|id| c.customer_id.as_deref() == Some(id))
            })
            .cloned())
    }

    async fn list_lifecycles(&self) -> Result<Vec<LifecycleDefinition>> {
        self.record("list_lifecycles")?;
        Ok(self.lifecycles.lock().unwrap().clone())
    }

    async fn upload_file(
        &self,
        _session_id: &str,
        product: &str,
        document: &FileDocument,
    ) -> Result<Vec<UploadReceipt>> {
        self.record(format!("upload_file:{}", document.file_name))?;
        self.products.lock().unwrap().push(product.to_string());
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(vec![UploadReceipt {
            case_id: "case-1".to_string(),
            doc_id: format!("d{n}"),
            document_name: document.file_name.clone(),
            status: "UPLOADED".to_string(),
        }])
    }

    async fn upload_text(
        &self,
        _session_id: &str,
        product: &str,
        document: &PastedDocument,
    ) -> Result<UploadReceipt> {
        self.record(format!("upload_text:{}", document.name))?;
        self.products.lock().unwrap().push(product.to_string());
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(UploadReceipt {
            case_id: "case-1".to_string(),
            doc_id: format!("d{n}"),
            document_name: document.name.clone(),
            status: "UPLOADED".to_string(),
        })
    }

    async fn drafts(&self, session_id: &str) -> Result<Vec<Draft>> {
        self.record("drafts")?;
        Ok(self
            .drafts
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn ocr_pages(&self, doc_id: &str) -> Result<Vec<OcrPage>> {
        let gate = self.gates.lock().unwrap().get(doc_id).cloned();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
        self.record(format!("ocr_pages:{doc_id}"))?;
        Ok(self
            .ocr
            .lock()
            .unwrap()
            .get(doc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn classification_pages(&self, doc_id: &str) -> Result<Vec<ClassificationPage>> {
        self.record(format!("classification_pages:{doc_id}"))?;
        Ok(self
            .classification
            .lock()
            .unwrap()
            .get(doc_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn final_ocr(&self, doc_id: &str) -> Result<Vec<FinalOcrRecord>> {
        self.record(format!("final_ocr:{doc_id}"))?;
        Ok(self
            .final_ocr
            .lock()
            .unwrap()
            .get(doc_id)
            .cloned()
            .into_iter()
            .collect())
    }

    async fn summary(&self, doc_id: &str) -> Result<Option<SummaryRecord>> {
        self.record(format!("summary:{doc_id}"))?;
        Ok(self.summaries.lock().unwrap().get(doc_id).cloned())
    }

    async fn review_record(&self, doc_id: &str) -> Result<Option<ReviewRecord>> {
        self.record(format!("review_record:{doc_id}"))?;
        Ok(self.reviews.lock().unwrap().get(doc_id).cloned())
    }

    async fn save_review(&self, doc_id: &str, documents_json: &str, _user: &str) -> Result<()> {
        self.record("save_review")?;
        let mut reviews = self.reviews.lock().unwrap();
        let version = reviews
            .get(doc_id)
            .and_then(|r| r.version)
            .unwrap_or(0)
            + 1;
        reviews.insert(
            doc_id.to_string(),
            ReviewRecord {
                doc_id: doc_id.to_string(),
                documents_json: documents_json.to_string(),
                status: "IN_REVIEW".to_string(),
                version: Some(version),
            },
        );
        Ok(())
    }

    async fn approve(&self, doc_id: &str, _user: &str) -> Result<()> {
        self.record(format!("approve:{doc_id}"))?;
        self.mark_approved(doc_id);
        Ok(())
    }
}

/// In-memory `SnapshotStore` with the same dedupe/bound semantics as
/// the TOML store.
#[derive(Default)]
pub(crate) struct MemorySnapshots {
    current: Mutex<Option<Session>>,
    recent: Mutex<Vec<Session>>,
}

#[async_trait]
impl SnapshotStore for MemorySnapshots {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn set_current_session(&self, session: &Session) -> Result<()> {
        let mut recent = self.recent.lock().unwrap();
        recent.retain(|s| s.id != session.id);
        recent.insert(0, session.clone());
        recent.truncate(RECENT_SESSIONS_LIMIT);
        *self.current.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn clear_current_session(&self) -> Result<()> {
        *self.current.lock().unwrap() = None;
        Ok(())
    }

    async fn recent_sessions(&self) -> Result<Vec<Session>> {
        Ok(self.recent.lock().unwrap().clone())
    }

    async fn remove_session(&self, session_id: &str) -> Result<()> {
        self.recent.lock().unwrap().retain(|s| s.id != session_id);
        let mut current = self.current.lock().unwrap();
        if current.as_ref().is_some_and(|s| s.id == session_id) {
            *current = None;
        }
        Ok(())
    }
}
