//! Canonical in-memory form of a `documents_json` blob.
//!
//! The wire shape is polymorphic: the top level may be a mapping from
//! document-type name to either a single page record or an array of
//! them, or a bare array with no grouping at all. Parsing normalizes
//! everything into ordered lists once, at this boundary, so downstream
//! logic never sees the polymorphism. Serializing always emits arrays.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group name used when the wire delivers a bare, ungrouped array.
const DEFAULT_GROUP: &str = "default";

/// One page entry within a logical document-type group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    #[serde(default)]
    pub page_no: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub signature_stamp: Option<String>,
}

/// One logical document-type with its ordered page entries. A document
/// may span multiple physical pages and be regrouped differently than
/// the physical upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentGroup {
    pub name: String,
    pub pages: Vec<PageEntry>,
}

/// The parsed, canonical form of `documents_json`: always a list of
/// groups, each with an ordered list of pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledDocuments {
    groups: Vec<DocumentGroup>,
}

/// Wire tolerance: a group value may be one record or an array.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<PageEntry>),
    One(PageEntry),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<PageEntry> {
        match self {
            Self::Many(pages) => pages,
            Self::One(page) => vec![page],
        }
    }
}

/// Wire tolerance: the top level may be grouped or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocuments {
    Grouped(BTreeMap<String, OneOrMany>),
    Flat(Vec<PageEntry>),
}

impl AssembledDocuments {
    /// Parses a serialized `documents_json` blob into canonical form.
    ///
    /// Group order is alphabetical (matching the assembly order of the
    /// processing service); pages within a group are ordered by
    /// `page_no`. A blank input parses to the empty value.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the blob is not valid JSON of
    /// any tolerated shape.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawDocuments = serde_json::from_str(raw)?;
        let mut groups = match raw {
            RawDocuments::Grouped(map) => map
                .into_iter()
                .map(|(name, pages)| DocumentGroup {
                    name,
                    pages: pages.into_vec(),
                })
                .collect::<Vec<_>>(),
            RawDocuments::Flat(pages) => vec![DocumentGroup {
                name: DEFAULT_GROUP.to_string(),
                pages,
            }],
        };

        for group in &mut groups {
            group.pages.sort_by_key(|p| p.page_no);
        }

        Ok(Self { groups })
    }

    /// Serializes back to the wire form, always emitting arrays.
    pub fn to_json(&self) -> Result<String> {
        let map: BTreeMap<&str, &[PageEntry]> = self
            .groups
            .iter()
            .map(|g| (g.name.as_str(), g.pages.as_slice()))
            .collect();
        Ok(serde_json::to_string(&map)?)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[DocumentGroup] {
        &self.groups
    }

    /// Looks up a page's text by `(doc_type, page_no)`.
    pub fn page_text(&self, doc_type: &str, page_no: u32) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.name == doc_type)?
            .pages
            .iter()
            .find(|p| p.page_no == page_no)
            .map(|p| p.text.as_str())
    }

    /// Replaces a page's text in place.
    ///
    /// # Errors
    ///
    /// Returns `Error::PageNotFound` when no page matches.
    pub fn set_page_text(&mut self, doc_type: &str, page_no: u32, text: &str) -> Result<()> {
        let page = self
            .groups
            .iter_mut()
            .find(|g| g.name == doc_type)
            .and_then(|g| g.pages.iter_mut().find(|p| p.page_no == page_no))
            .ok_or_else(|| Error::PageNotFound {
                doc_type: doc_type.to_string(),
                page_no,
            })?;
        page.text = text.to_string();
        Ok(())
    }
}
