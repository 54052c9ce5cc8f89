//! Tab-driven review pipeline for one session.
//!
//! Holds the drafts of the open session and, for the selected draft,
//! the per-stage collections (OCR, classification, final assembly) plus
//! the parsed assembled documents. Stage reads degrade to empty on
//! failure so one slow or missing stage never blanks the others.
//!
//! Draft switching is guarded against stale responses: each selection
//! bumps a generation and cancels the previous fetch, and a fetch only
//! commits its results while its generation is still current.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lcdesk_core::document::{
    AssembledDocuments, ClassificationPage, Draft, FinalOcrRecord, OcrPage, SummaryRecord,
};
use lcdesk_core::error::{Error, Result};
use lcdesk_core::gateway::ProcessingGateway;
use lcdesk_core::workflow::{PageKey, ReviewPhase, ReviewTab};

#[derive(Default)]
struct PipelineState {
    drafts: Vec<Draft>,
    selected: Option<String>,
    ocr_pages: Vec<OcrPage>,
    classification_pages: Vec<ClassificationPage>,
    final_ocr: Vec<FinalOcrRecord>,
    assembled: AssembledDocuments,
    summary: Option<SummaryRecord>,
    phase: ReviewPhase,
    active_tab: ReviewTab,
}

impl PipelineState {
    fn summary_visible(&self) -> bool {
        self.summary
            .as_ref()
            .is_some_and(|s| !s.documents_json.trim().is_empty())
    }
}

/// Guards draft selection against out-of-order responses.
struct Selection {
    generation: u64,
    token: CancellationToken,
}

/// Everything fetched for one selected draft.
struct LoadedStages {
    ocr_pages: Vec<OcrPage>,
    classification_pages: Vec<ClassificationPage>,
    final_ocr: Vec<FinalOcrRecord>,
    assembled: AssembledDocuments,
    summary: Option<SummaryRecord>,
    approved: bool,
}

/// Use case driving the review view of one session.
pub struct ReviewPipeline {
    gateway: Arc<dyn ProcessingGateway>,
    session_id: String,
    reviewer: String,
    state: RwLock<PipelineState>,
    selection: Mutex<Selection>,
}

impl ReviewPipeline {
    pub fn new(
        gateway: Arc<dyn ProcessingGateway>,
        session_id: impl Into<String>,
        reviewer: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            session_id: session_id.into(),
            reviewer: reviewer.into(),
            state: RwLock::new(PipelineState::default()),
            selection: Mutex::new(Selection {
                generation: 0,
                token: CancellationToken::new(),
            }),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Loads the session's drafts and selects the first one.
    ///
    /// A failed fetch logs and leaves the list empty; the review view
    /// opens either way.
    pub async fn load_drafts(&self) -> Result<Vec<Draft>> {
        let drafts = match self.gateway.drafts(&self.session_id).await {
            Ok(drafts) => drafts,
            Err(err) => {
                warn!(
                    "[ReviewPipeline] draft fetch for session {} failed: {}",
                    self.session_id, err
                );
                Vec::new()
            }
        };

        let first = {
            let mut state = self.state.write().await;
            state.drafts = drafts.clone();
            if !drafts.is_empty() && state.phase == ReviewPhase::Uploading {
                state.phase = ReviewPhase::AwaitingReview;
            }
            match (&state.selected, drafts.first()) {
                (None, Some(first)) => Some(first.doc_id.clone()),
                _ => None,
            }
        };

        if let Some(doc_id) = first {
            self.select_draft(&doc_id).await?;
        }
        Ok(drafts)
    }

    /// Selects a draft and loads its stage collections.
    ///
    /// Superseded selections return `Ok` without committing anything.
    ///
    /// # Errors
    ///
    /// `Error::DraftNotFound` for a doc_id outside the open session;
    /// `Error::AlreadyFinalized` when the pipeline is finalized on a
    /// different document.
    pub async fn select_draft(&self, doc_id: &str) -> Result<()> {
        {
            let state = self.state.read().await;
            if !state.drafts.iter().any(|d| d.doc_id == doc_id) {
                return Err(Error::DraftNotFound {
                    doc_id: doc_id.to_string(),
                });
            }
            if state.phase.is_finalized() && state.phase.doc_id() != Some(doc_id) {
                return Err(Error::AlreadyFinalized);
            }
        }

        let (generation, token) = {
            let mut selection = self.selection.lock().await;
            selection.token.cancel();
            selection.token = CancellationToken::new();
            selection.generation += 1;
            (selection.generation, selection.token.clone())
        };

        let loaded = tokio::select! {
            _ = token.cancelled() => {
                debug!("[ReviewPipeline] selection of {} superseded mid-fetch", doc_id);
                return Ok(());
            }
            loaded = self.fetch_stages(doc_id) => loaded,
        };

        // Re-check under the state write lock so a newer selection
        // cannot slip its commit in between the check and ours.
        let mut state = self.state.write().await;
        {
            let selection = self.selection.lock().await;
            if selection.generation != generation {
                debug!("[ReviewPipeline] discarding stale stages for {}", doc_id);
                return Ok(());
            }
        }
        state.selected = Some(doc_id.to_string());
        state.ocr_pages = loaded.ocr_pages;
        state.classification_pages = loaded.classification_pages;
        state.final_ocr = loaded.final_ocr;
        state.assembled = loaded.assembled;
        state.summary = loaded.summary;
        if loaded.approved || state.phase.is_finalized() {
            state.phase.mark_finalized(doc_id);
        } else {
            state.phase.begin_review(doc_id)?;
        }
        if state.active_tab == ReviewTab::Summary && !state.summary_visible() {
            state.active_tab = ReviewTab::Draft;
        }
        Ok(())
    }

    /// Fetches the three stage collections concurrently, then the
    /// review head and (for approved documents) the summary. Every
    /// stage degrades to empty on failure.
    async fn fetch_stages(&self, doc_id: &str) -> LoadedStages {
        let (ocr, classification, final_ocr) = futures::join!(
            self.gateway.ocr_pages(doc_id),
            self.gateway.classification_pages(doc_id),
            self.gateway.final_ocr(doc_id),
        );
        let ocr_pages = ocr.unwrap_or_else(|err| {
            warn!("[ReviewPipeline] OCR fetch for {} failed: {}", doc_id, err);
            Vec::new()
        });
        let classification_pages = classification.unwrap_or_else(|err| {
            warn!(
                "[ReviewPipeline] classification fetch for {} failed: {}",
                doc_id, err
            );
            Vec::new()
        });
        let final_ocr = final_ocr.unwrap_or_else(|err| {
            warn!(
                "[ReviewPipeline] final-OCR fetch for {} failed: {}",
                doc_id, err
            );
            Vec::new()
        });

        // The review store head carries the latest saved edits and wins
        // over the assembled record when present.
        let review = match self.gateway.review_record(doc_id).await {
            Ok(review) => review,
            Err(err) => {
                warn!(
                    "[ReviewPipeline] review head fetch for {} failed: {}",
                    doc_id, err
                );
                None
            }
        };
        let blob = review
            .as_ref()
            .map(|r| r.documents_json.as_str())
            .filter(|b| !b.trim().is_empty())
            .or_else(|| final_ocr.first().map(|r| r.documents_json.as_str()))
            .unwrap_or("");
        let assembled = AssembledDocuments::parse(blob).unwrap_or_else(|err| {
            warn!(
                "[ReviewPipeline] unparseable documents_json for {}: {}",
                doc_id, err
            );
            AssembledDocuments::default()
        });

        let approved = final_ocr.iter().any(FinalOcrRecord::is_approved);
        let summary = if approved {
            match self.gateway.summary(doc_id).await {
                Ok(summary) => summary,
                Err(err) => {
                    warn!(
                        "[ReviewPipeline] summary fetch for {} failed: {}",
                        doc_id, err
                    );
                    None
                }
            }
        } else {
            None
        };

        LoadedStages {
            ocr_pages,
            classification_pages,
            final_ocr,
            assembled,
            summary,
            approved,
        }
    }

    /// Tabs currently visible: the four base tabs, plus Summary once a
    /// non-empty summary exists.
    pub async fn visible_tabs(&self) -> Vec<ReviewTab> {
        let state = self.state.read().await;
        let mut tabs = ReviewTab::BASE.to_vec();
        if state.summary_visible() {
            tabs.push(ReviewTab::Summary);
        }
        tabs
    }

    pub async fn active_tab(&self) -> ReviewTab {
        self.state.read().await.active_tab
    }

    /// Switches the active tab.
    ///
    /// # Errors
    ///
    /// `Error::SummaryHidden` while no summary exists.
    pub async fn set_active_tab(&self, tab: ReviewTab) -> Result<()> {
        let mut state = self.state.write().await;
        if tab == ReviewTab::Summary && !state.summary_visible() {
            return Err(Error::SummaryHidden);
        }
        state.active_tab = tab;
        Ok(())
    }

    /// Opens one assembled page row for editing.
    pub async fn begin_edit(&self, doc_type: &str, page_no: u32) -> Result<()> {
        let mut state = self.state.write().await;
        if state.assembled.page_text(doc_type, page_no).is_none() {
            return Err(Error::PageNotFound {
                doc_type: doc_type.to_string(),
                page_no,
            });
        }
        state.phase.begin_edit(PageKey::new(doc_type, page_no))
    }

    /// Closes an editing row without saving.
    pub async fn cancel_edit(&self, doc_type: &str, page_no: u32) {
        let mut state = self.state.write().await;
        state.phase.end_edit(&PageKey::new(doc_type, page_no));
    }

    /// Saves one page edit: the whole assembled blob, with the edited
    /// page replaced, goes to the review store. Local state only
    /// changes after the service accepts the save.
    pub async fn save_page_edit(&self, doc_type: &str, page_no: u32, text: &str) -> Result<()> {
        let (doc_id, mut edited) = {
            let state = self.state.read().await;
            if state.phase.is_finalized() {
                return Err(Error::AlreadyFinalized);
            }
            let doc_id = state
                .phase
                .doc_id()
                .ok_or_else(|| Error::internal("no draft is under review"))?
                .to_string();
            (doc_id, state.assembled.clone())
        };
        edited.set_page_text(doc_type, page_no, text)?;
        let blob = edited.to_json()?;

        self.gateway
            .save_review(&doc_id, &blob, &self.reviewer)
            .await?;
        info!(
            "[ReviewPipeline] saved edit of {}/page {} on {}",
            doc_type, page_no, doc_id
        );

        let mut state = self.state.write().await;
        if state.phase.doc_id() == Some(doc_id.as_str()) {
            state.assembled = edited;
            state.phase.end_edit(&PageKey::new(doc_type, page_no));
        }
        Ok(())
    }

    /// Approves the selected document. One-way: afterwards every edit
    /// and re-finalize under this pipeline is refused.
    pub async fn finalize(&self) -> Result<()> {
        let doc_id = {
            let state = self.state.read().await;
            if state.phase.is_finalized() {
                return Err(Error::AlreadyFinalized);
            }
            state
                .phase
                .doc_id()
                .ok_or_else(|| Error::internal("no draft is under review"))?
                .to_string()
        };

        self.gateway.approve(&doc_id, &self.reviewer).await?;
        info!("[ReviewPipeline] finalized {}", doc_id);

        let summary = match self.gateway.summary(&doc_id).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(
                    "[ReviewPipeline] summary fetch after approval failed: {}",
                    err
                );
                None
            }
        };

        let mut state = self.state.write().await;
        state.phase.finalize()?;
        state.summary = summary;
        if state.summary_visible() {
            state.active_tab = ReviewTab::Summary;
        }
        Ok(())
    }

    // ---- read accessors for the presentation layer ----------------------

    pub async fn drafts(&self) -> Vec<Draft> {
        self.state.read().await.drafts.clone()
    }

    pub async fn selected_doc_id(&self) -> Option<String> {
        self.state.read().await.selected.clone()
    }

    pub async fn ocr_pages(&self) -> Vec<OcrPage> {
        self.state.read().await.ocr_pages.clone()
    }

    pub async fn classification_pages(&self) -> Vec<ClassificationPage> {
        self.state.read().await.classification_pages.clone()
    }

    pub async fn assembled(&self) -> AssembledDocuments {
        self.state.read().await.assembled.clone()
    }

    pub async fn summary(&self) -> Option<SummaryRecord> {
        self.state.read().await.summary.clone()
    }

    pub async fn phase(&self) -> ReviewPhase {
        self.state.read().await.phase.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingGateway;

    const BLOB: &str = r#"{"invoice":[{"page_no":1,"text":"one"},{"page_no":2,"text":"two"}]}"#;

    fn gateway_with_session() -> Arc<RecordingGateway> {
        let gateway = Arc::new(RecordingGateway::default());
        gateway.add_draft("s1", "d1", "LC application");
        gateway.add_draft("s1", "d2", "Invoice");
        gateway.set_final_ocr_blob("d1", BLOB);
        gateway.set_final_ocr_blob("d2", r#"{"invoice":[{"page_no":1,"text":"other"}]}"#);
        gateway.set_ocr_page("d1", 1, "ocr one");
        gateway.set_ocr_page("d2", 1, "ocr other");
        gateway
    }

    fn pipeline(gateway: &Arc<RecordingGateway>) -> ReviewPipeline {
        ReviewPipeline::new(gateway.clone(), "s1", "reviewer")
    }

    #[tokio::test]
    async fn loading_drafts_selects_the_first_one() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);

        let drafts = pipeline.load_drafts().await.unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(pipeline.selected_doc_id().await.as_deref(), Some("d1"));
        assert_eq!(pipeline.assembled().await.page_text("invoice", 1), Some("one"));
        assert_eq!(pipeline.ocr_pages().await.len(), 1);
    }

    #[tokio::test]
    async fn selecting_an_unknown_draft_is_refused() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();

        let err = pipeline.select_draft("nope").await.unwrap_err();
        assert!(matches!(err, Error::DraftNotFound { .. }));
    }

    #[tokio::test]
    async fn summary_tab_appears_only_after_finalize() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();

        assert_eq!(pipeline.visible_tabs().await, ReviewTab::BASE.to_vec());
        assert!(matches!(
            pipeline.set_active_tab(ReviewTab::Summary).await,
            Err(Error::SummaryHidden)
        ));

        pipeline.finalize().await.unwrap();
        let tabs = pipeline.visible_tabs().await;
        assert_eq!(tabs.len(), 5);
        assert_eq!(tabs[4], ReviewTab::Summary);
        // finalize lands the operator on the freshly published summary
        assert_eq!(pipeline.active_tab().await, ReviewTab::Summary);
        assert!(pipeline.summary().await.is_some());
    }

    #[tokio::test]
    async fn finalize_is_one_way() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();
        pipeline.finalize().await.unwrap();

        assert!(matches!(
            pipeline.finalize().await,
            Err(Error::AlreadyFinalized)
        ));
        assert!(matches!(
            pipeline.save_page_edit("invoice", 1, "late edit").await,
            Err(Error::AlreadyFinalized)
        ));
        assert!(matches!(
            pipeline.begin_edit("invoice", 1).await,
            Err(Error::AlreadyFinalized)
        ));
        assert!(matches!(
            pipeline.select_draft("d2").await,
            Err(Error::AlreadyFinalized)
        ));
        // only one approval reached the service
        let approvals = gateway
            .calls()
            .iter()
            .filter(|c| c.starts_with("approve"))
            .count();
        assert_eq!(approvals, 1);
    }

    #[tokio::test]
    async fn already_approved_documents_load_as_finalized() {
        let gateway = gateway_with_session();
        gateway.approve_directly("d1");
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();

        assert!(pipeline.phase().await.is_finalized());
        assert!(pipeline.summary().await.is_some());
        assert!(matches!(
            pipeline.save_page_edit("invoice", 1, "x").await,
            Err(Error::AlreadyFinalized)
        ));
    }

    #[tokio::test]
    async fn page_edit_round_trips_through_the_review_store() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();

        pipeline.begin_edit("invoice", 2).await.unwrap();
        pipeline
            .save_page_edit("invoice", 2, "edited text")
            .await
            .unwrap();

        // the service received the whole blob with only that page changed
        let saved = gateway.review_blob("d1").unwrap();
        let parsed = AssembledDocuments::parse(&saved).unwrap();
        assert_eq!(parsed.page_text("invoice", 1), Some("one"));
        assert_eq!(parsed.page_text("invoice", 2), Some("edited text"));

        // local state committed and the editing row closed
        let assembled = pipeline.assembled().await;
        assert_eq!(assembled.page_text("invoice", 2), Some("edited text"));
        assert!(!pipeline.phase().await.is_editing(&PageKey::new("invoice", 2)));
    }

    #[tokio::test]
    async fn rejected_save_leaves_local_state_untouched() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();

        gateway.fail_on("save_review");
        let err = pipeline
            .save_page_edit("invoice", 2, "edited text")
            .await
            .unwrap_err();
        assert!(!err.is_validation());
        assert_eq!(
            pipeline.assembled().await.page_text("invoice", 2),
            Some("two"),
            "failed save must not commit locally"
        );
    }

    #[tokio::test]
    async fn editing_a_missing_page_is_refused() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();

        let err = pipeline
            .save_page_edit("invoice", 9, "text")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PageNotFound { page_no: 9, .. }));
        let err = pipeline.begin_edit("bill_of_lading", 1).await.unwrap_err();
        assert!(matches!(err, Error::PageNotFound { .. }));
    }

    #[tokio::test]
    async fn saved_edits_win_over_the_assembled_record_on_reload() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();
        pipeline
            .save_page_edit("invoice", 1, "reviewer version")
            .await
            .unwrap();

        // a fresh pipeline for the same session sees the review head
        let reopened = ReviewPipeline::new(gateway.clone(), "s1", "reviewer");
        reopened.load_drafts().await.unwrap();
        assert_eq!(
            reopened.assembled().await.page_text("invoice", 1),
            Some("reviewer version")
        );
    }

    #[tokio::test]
    async fn slow_superseded_selection_never_overwrites_the_newer_one() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();

        // d1's OCR fetch now blocks until released
        gateway.gate_ocr("d1");

        let select_stale = pipeline.select_draft("d1");
        let select_fresh = async {
            // let the d1 selection reach its gated fetch first
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
            pipeline.select_draft("d2").await
        };
        let (stale, fresh) = tokio::join!(select_stale, select_fresh);
        stale.unwrap();
        fresh.unwrap();

        assert_eq!(pipeline.selected_doc_id().await.as_deref(), Some("d2"));
        assert_eq!(
            pipeline.assembled().await.page_text("invoice", 1),
            Some("other"),
            "the superseded selection must not overwrite the newer one"
        );
        assert_eq!(pipeline.ocr_pages().await[0].extracted_text, "ocr other");
    }

    #[tokio::test]
    async fn stage_results_arriving_after_a_newer_commit_are_discarded() {
        let gateway = gateway_with_session();
        let pipeline = pipeline(&gateway);
        pipeline.load_drafts().await.unwrap();

        gateway.gate_ocr("d1");

        let stale = pipeline.select_draft("d1");
        let fresh = async {
            for _ in 0..4 {
                tokio::task::yield_now().await;
            }
            pipeline.select_draft("d2").await.unwrap();
            // the blocked fetch finishes only after the newer selection
            // has committed
            gateway.release_ocr("d1");
        };
        let (stale, ()) = tokio::join!(stale, fresh);
        stale.unwrap();

        assert_eq!(pipeline.selected_doc_id().await.as_deref(), Some("d2"));
        assert_eq!(pipeline.ocr_pages().await[0].extracted_text, "ocr other");
    }
}
