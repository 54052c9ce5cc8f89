//! Explicit review workflow state.
//!
//! The review pipeline's visible states are tabs; its editing state is
//! a finite-state machine per session. Modeling the phase explicitly
//! (instead of independent boolean flags) makes editing after finalize
//! unrepresentable rather than merely disabled in the UI.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The tabs of the review view, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTab {
    #[default]
    Draft,
    Ocr,
    Classification,
    FinalOcr,
    Summary,
}

impl ReviewTab {
    /// The four always-visible tabs; `Summary` appears only once a
    /// non-empty summary exists.
    pub const BASE: [ReviewTab; 4] = [
        ReviewTab::Draft,
        ReviewTab::Ocr,
        ReviewTab::Classification,
        ReviewTab::FinalOcr,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Ocr => "OCR",
            Self::Classification => "Classification",
            Self::FinalOcr => "Assemble workshop",
            Self::Summary => "Summary",
        }
    }
}

/// Identifies one editable page entry within the assembled documents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageKey {
    pub doc_type: String,
    pub page_no: u32,
}

impl PageKey {
    pub fn new(doc_type: impl Into<String>, page_no: u32) -> Self {
        Self {
            doc_type: doc_type.into(),
            page_no,
        }
    }
}

/// Review phase of one session's pipeline.
///
/// Finalization is one-way and scoped to the whole reviewed artifact:
/// once `Finalized`, every edit and finalize affordance under the
/// pipeline is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "data")]
pub enum ReviewPhase {
    /// Documents submitted, processing not yet inspected.
    #[default]
    Uploading,
    /// Drafts are known but none is under review yet.
    AwaitingReview,
    /// A draft is selected and its pages may be edited.
    Reviewing {
        doc_id: String,
        /// Rows currently open for editing.
        editing: BTreeSet<PageKey>,
    },
    /// The artifact is approved and read-only.
    Finalized { doc_id: String },
}

impl ReviewPhase {
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized { .. })
    }

    /// The doc_id under review or finalized, if any.
    pub fn doc_id(&self) -> Option<&str> {
        match self {
            Self::Reviewing { doc_id, .. } | Self::Finalized { doc_id } => Some(doc_id),
            _ => None,
        }
    }

    /// Enters review of the given draft. Switching drafts resets the
    /// editing rows; a finalized pipeline stays finalized.
    pub fn begin_review(&mut self, doc_id: &str) -> Result<()> {
        if self.is_finalized() {
            return Err(Error::AlreadyFinalized);
        }
        *self = Self::Reviewing {
            doc_id: doc_id.to_string(),
            editing: BTreeSet::new(),
        };
        Ok(())
    }

    /// Opens one row for editing.
    pub fn begin_edit(&mut self, key: PageKey) -> Result<()> {
        match self {
            Self::Finalized { .. } => Err(Error::AlreadyFinalized),
            Self::Reviewing { editing, .. } => {
                editing.insert(key);
                Ok(())
            }
            _ => Err(Error::internal("no draft is under review")),
        }
    }

    /// Closes one editing row (after save or cancel).
    pub fn end_edit(&mut self, key: &PageKey) {
        if let Self::Reviewing { editing, .. } = self {
            editing.remove(key);
        }
    }

    pub fn is_editing(&self, key: &PageKey) -> bool {
        matches!(self, Self::Reviewing { editing, .. } if editing.contains(key))
    }

    /// One-way transition to `Finalized`. There is no reopen.
    pub fn finalize(&mut self) -> Result<()> {
        match self {
            Self::Finalized { .. } => Err(Error::AlreadyFinalized),
            Self::Reviewing { doc_id, .. } => {
                *self = Self::Finalized {
                    doc_id: std::mem::take(doc_id),
                };
                Ok(())
            }
            _ => Err(Error::internal("no draft is under review")),
        }
    }

    /// Marks the pipeline finalized from fetched state (the service
    /// reported the record as approved).
    pub fn mark_finalized(&mut self, doc_id: &str) {
        *self = Self::Finalized {
            doc_id: doc_id.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_lifecycle_happy_path() {
        let mut phase = ReviewPhase::default();
        phase.begin_review("doc-1").unwrap();

        let key = PageKey::new("invoice", 2);
        phase.begin_edit(key.clone()).unwrap();
        assert!(phase.is_editing(&key));

        phase.end_edit(&key);
        assert!(!phase.is_editing(&key));

        phase.finalize().unwrap();
        assert!(phase.is_finalized());
        assert_eq!(phase.doc_id(), Some("doc-1"));
    }

    #[test]
    fn finalize_is_one_way() {
        let mut phase = ReviewPhase::default();
        phase.begin_review("doc-1").unwrap();
        phase.finalize().unwrap();

        assert!(matches!(phase.finalize(), Err(Error::AlreadyFinalized)));
        assert!(matches!(
            phase.begin_edit(PageKey::new("invoice", 1)),
            Err(Error::AlreadyFinalized)
        ));
        assert!(matches!(
            phase.begin_review("doc-2"),
            Err(Error::AlreadyFinalized)
        ));
    }

    #[test]
    fn editing_requires_a_selected_draft() {
        let mut phase = ReviewPhase::Uploading;
        assert!(phase.begin_edit(PageKey::new("invoice", 1)).is_err());
        assert!(phase.finalize().is_err());
    }

    #[test]
    fn switching_drafts_resets_editing_rows() {
        let mut phase = ReviewPhase::default();
        phase.begin_review("doc-1").unwrap();
        phase.begin_edit(PageKey::new("invoice", 1)).unwrap();

        phase.begin_review("doc-2").unwrap();
        assert!(!phase.is_editing(&PageKey::new("invoice", 1)));
        assert_eq!(phase.doc_id(), Some("doc-2"));
    }
}
