//! HTTP implementation of the [`ProcessingGateway`] port.
//!
//! Talks to the document-processing service's JSON/REST API. Per-draft
//! stage reads treat HTTP 404 as "nothing yet" and come back empty;
//! everything else becomes a typed error with the response body as the
//! message where the service provides one.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use lcdesk_core::config::ProcessingConfig;
use lcdesk_core::document::{
    ClassificationPage, Draft, FinalOcrRecord, OcrPage, ReviewRecord, SummaryRecord,
};
use lcdesk_core::error::{Error, Result};
use lcdesk_core::gateway::ProcessingGateway;
use lcdesk_core::lifecycle::LifecycleDefinition;
use lcdesk_core::session::{CustomerRecord, NewSession, Session};
use lcdesk_core::upload::{FileDocument, PastedDocument, UploadReceipt};

use crate::dto::{
    BulkUploadResponse, CustomerDto, LifecycleDto, NewSessionBody, OneOrMany, ReviewSaveBody,
    SessionDto, TextUploadBody, TextUploadResponse,
};

/// Maps transport and decode failures from the HTTP client into the
/// shared error type. The domain error lives in `lcdesk-core`, which
/// does no I/O; the mapping belongs here at the wire boundary.
pub(crate) fn http_error(err: reqwest::Error) -> Error {
    if err.is_decode() {
        return Error::decode(err.to_string());
    }
    if let Some(status) = err.status() {
        return Error::service(status.as_u16(), err.to_string());
    }
    Error::transport(err.to_string())
}

/// Gateway to the document-processing service over HTTP.
#[derive(Clone)]
pub struct HttpProcessingGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpProcessingGateway {
    pub fn new(config: &ProcessingConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turns a non-success response into a Service error carrying the
    /// response body, which is where this service puts its detail text.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body
        };
        Err(Error::service(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(http_error)?;
        let response = Self::check(response).await?;
        Ok(response.json().await.map_err(http_error)?)
    }

    /// GET that treats 404 as an empty/default result.
    async fn get_json_or<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(http_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("[ProcessingGateway] {} -> 404, treating as empty", path);
            return Ok(T::default());
        }
        let response = Self::check(response).await?;
        Ok(response.json().await.map_err(http_error)?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self
            .client
            .post(self.url(path))
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(http_error)?;
        let response = Self::check(response).await?;
        Ok(response.json().await.map_err(http_error)?)
    }
}

#[async_trait]
impl ProcessingGateway for HttpProcessingGateway {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let rows: Vec<SessionDto> = self.get_json("sessions").await?;
        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn create_session(&self, payload: &NewSession) -> Result<Session> {
        let row: SessionDto = self
            .post_json("sessions", &NewSessionBody::from(payload))
            .await?;
        let session = Session::from(row);
        debug!("[ProcessingGateway] created session {}", session.id);
        Ok(session)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("sessions/{session_id}")))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(http_error)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn save_customer(&self, customer: &CustomerRecord) -> Result<()> {
        let response = self
            .client
            .post(self.url("save-customers"))
            .timeout(self.timeout)
            .json(&CustomerDto::from(customer))
            .send()
            .await
            .map_err(http_error)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_customer(
        &self,
        cif_number: Option<&str>,
        customer_id: Option<&str>,
    ) -> Result<Option<CustomerRecord>> {
        let mut request = self.client.get(self.url("get-customer")).timeout(self.timeout);
        if let Some(cif) = cif_number {
            request = request.query(&[("cifNumber", cif)]);
        }
        if let Some(id) = customer_id {
            request = request.query(&[("customerId", id)]);
        }
        let response = request.send().await.map_err(http_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        let dto: Option<CustomerDto> = response.json().await.map_err(http_error)?;
        Ok(dto.map(CustomerRecord::from))
    }

    async fn list_lifecycles(&self) -> Result<Vec<LifecycleDefinition>> {
        let rows: Vec<LifecycleDto> = self.get_json("lifecycles").await?;
        Ok(rows.into_iter().map(LifecycleDefinition::from).collect())
    }

    async fn upload_file(
        &self,
        session_id: &str,
        product: &str,
        document: &FileDocument,
    ) -> Result<Vec<UploadReceipt>> {
        let part = Part::bytes(document.content.clone()).file_name(document.file_name.clone());
        let form = Form::new()
            .text("product", product.to_string())
            .text("session_id", session_id.to_string())
            .part("files", part);

        let response = self
            .client
            .post(self.url("upload-bulk"))
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;
        let response = Self::check(response).await?;
        let parsed: BulkUploadResponse = response.json().await.map_err(http_error)?;

        Ok(parsed
            .documents
            .into_iter()
            .map(|doc| UploadReceipt {
                case_id: parsed.case_id.clone(),
                doc_id: doc.doc_id,
                document_name: doc.file_name,
                status: doc.status,
            })
            .collect())
    }

    async fn upload_text(
        &self,
        session_id: &str,
        product: &str,
        document: &PastedDocument,
    ) -> Result<UploadReceipt> {
        let body = TextUploadBody {
            session_id,
            product,
            document_name: &document.name,
            content: &document.content,
        };
        let parsed: TextUploadResponse = self.post_json("upload-text-json", &body).await?;
        Ok(UploadReceipt {
            case_id: parsed.case_id,
            doc_id: parsed.doc_id,
            document_name: document.name.clone(),
            status: parsed.status,
        })
    }

    async fn drafts(&self, session_id: &str) -> Result<Vec<Draft>> {
        let rows: Option<OneOrMany<Draft>> = self
            .get_json_or(&format!("drafts/current/{session_id}"))
            .await?;
        Ok(rows.map(OneOrMany::into_vec).unwrap_or_default())
    }

    async fn ocr_pages(&self, doc_id: &str) -> Result<Vec<OcrPage>> {
        let rows: Option<OneOrMany<OcrPage>> =
            self.get_json_or(&format!("ocr/current/{doc_id}")).await?;
        let mut pages = rows.map(OneOrMany::into_vec).unwrap_or_default();
        pages.sort_by_key(|p| p.page_no);
        Ok(pages)
    }

    async fn classification_pages(&self, doc_id: &str) -> Result<Vec<ClassificationPage>> {
        let rows: Option<OneOrMany<ClassificationPage>> = self
            .get_json_or(&format!("classification/current/{doc_id}"))
            .await?;
        let mut pages = rows.map(OneOrMany::into_vec).unwrap_or_default();
        pages.sort_by_key(|p| p.page_no);
        Ok(pages)
    }

    async fn final_ocr(&self, doc_id: &str) -> Result<Vec<FinalOcrRecord>> {
        let rows: Option<OneOrMany<FinalOcrRecord>> =
            self.get_json_or(&format!("final_ocr/current/{doc_id}")).await?;
        Ok(rows.map(OneOrMany::into_vec).unwrap_or_default())
    }

    async fn summary(&self, doc_id: &str) -> Result<Option<SummaryRecord>> {
        let rows: Option<OneOrMany<SummaryRecord>> =
            self.get_json_or(&format!("summary/current/{doc_id}")).await?;
        Ok(rows
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .next())
    }

    async fn review_record(&self, doc_id: &str) -> Result<Option<ReviewRecord>> {
        let row: Option<ReviewRecord> =
            self.get_json_or(&format!("review/{doc_id}")).await?;
        Ok(row)
    }

    async fn save_review(&self, doc_id: &str, documents_json: &str, user: &str) -> Result<()> {
        let body = ReviewSaveBody {
            documents_json,
            user,
        };
        let response = self
            .client
            .put(self.url(&format!("review/{doc_id}")))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(http_error)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn approve(&self, doc_id: &str, user: &str) -> Result<()> {
        // The approval body is the bare reviewer name as a JSON string.
        let response = self
            .client
            .post(self.url(&format!("review/{doc_id}/approve")))
            .timeout(self.timeout)
            .json(&user)
            .send()
            .await
            .map_err(http_error)?;
        if let Err(err) = Self::check(response).await {
            warn!("[ProcessingGateway] approve {} failed: {}", doc_id, err);
            return Err(err);
        }
        Ok(())
    }
}
