//! Per-session document artifacts across the processing stages.

pub mod assembled;
pub mod model;

pub use assembled::{AssembledDocuments, DocumentGroup, PageEntry};
pub use model::{
    ClassificationPage, Draft, FinalOcrRecord, OcrPage, ReviewRecord, SummaryRecord,
    FINAL_OCR_STATUS_APPROVED,
};
