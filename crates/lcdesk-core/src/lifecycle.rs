//! Lifecycle template entities.
//!
//! A lifecycle is a named transition within an instrument type (e.g. LC
//! issuance, amendment) governing which documents are expected. These
//! are read-only templates used to drive session creation.

use serde::{Deserialize, Serialize};

/// One instrument/transition template with its expected document list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleDefinition {
    pub id: String,
    pub instrument: String,
    pub transition: String,
    /// Document names expected for this transition, already split from
    /// the wire's comma-separated form.
    #[serde(default)]
    pub required_documents: Vec<String>,
}

impl LifecycleDefinition {
    /// Display label combining instrument and transition.
    pub fn full_name(&self) -> String {
        format!("{} / {}", self.instrument, self.transition)
    }
}
