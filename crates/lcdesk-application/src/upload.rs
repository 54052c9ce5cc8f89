//! Upload coordination use case.
//!
//! Submits one batch of documents to a session, in one of the two
//! modes. Documents go up sequentially, main document first, and the
//! batch aborts on the first failure; earlier submissions are not
//! rolled back (the service has no cancel). A successful batch is
//! followed by a settling delay so the service's asynchronous
//! processing has begun by the time the review view opens.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use lcdesk_core::config::ProcessingConfig;
use lcdesk_core::error::{Error, Result};
use lcdesk_core::gateway::ProcessingGateway;
use lcdesk_core::upload::{UploadBatch, UploadOutcome, UploadReceipt};

pub struct UploadCoordinator {
    gateway: Arc<dyn ProcessingGateway>,
    config: ProcessingConfig,
}

impl UploadCoordinator {
    pub fn new(gateway: Arc<dyn ProcessingGateway>, config: ProcessingConfig) -> Self {
        Self { gateway, config }
    }

    /// Submits a batch to the given session. The batch is consumed, so
    /// collected documents cannot be resubmitted by accident.
    ///
    /// # Errors
    ///
    /// `Error::EmptyUpload` when nothing submittable is in the batch;
    /// `Error::UploadAborted` when a document fails partway, naming the
    /// failed document and how many were already submitted.
    pub async fn submit(&self, session_id: &str, batch: UploadBatch) -> Result<UploadOutcome> {
        if batch.is_empty() {
            return Err(Error::EmptyUpload);
        }

        let batch_id = Uuid::new_v4();
        info!(
            "[UploadCoordinator] batch {} for session {} starting",
            batch_id, session_id
        );

        let receipts = match &batch {
            UploadBatch::Files { main, supporting } => {
                let documents: Vec<_> = main.iter().chain(supporting.iter()).collect();
                let total = documents.len();
                let mut receipts = Vec::new();
                for (index, document) in documents.into_iter().enumerate() {
                    match self
                        .gateway
                        .upload_file(session_id, &self.config.file_product, document)
                        .await
                    {
                        Ok(accepted) => receipts.extend(accepted),
                        Err(err) => {
                            return Err(self.abort(batch_id, &document.file_name, index, total, err))
                        }
                    }
                }
                receipts
            }
            UploadBatch::Pasted { main, supporting } => {
                let documents: Vec<_> = main
                    .iter()
                    .chain(supporting.iter())
                    .filter(|d| !d.is_blank())
                    .map(|d| d.trimmed())
                    .collect();
                let total = documents.len();
                let mut receipts: Vec<UploadReceipt> = Vec::new();
                for (index, document) in documents.iter().enumerate() {
                    match self
                        .gateway
                        .upload_text(session_id, &self.config.text_product, document)
                        .await
                    {
                        Ok(receipt) => receipts.push(receipt),
                        Err(err) => {
                            return Err(self.abort(batch_id, &document.name, index, total, err))
                        }
                    }
                }
                receipts
            }
        };

        info!(
            "[UploadCoordinator] batch {} accepted ({} documents)",
            batch_id,
            receipts.len()
        );
        if self.config.settle_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.settle_ms)).await;
        }

        Ok(UploadOutcome { batch_id, receipts })
    }

    fn abort(
        &self,
        batch_id: Uuid,
        document: &str,
        submitted: usize,
        total: usize,
        source: Error,
    ) -> Error {
        warn!(
            "[UploadCoordinator] batch {} aborted at '{}' after {} submissions: {}",
            batch_id, document, submitted, source
        );
        Error::UploadAborted {
            document: document.to_string(),
            submitted,
            remaining: total - submitted - 1,
            source: Box::new(source),
        }
    }
}
