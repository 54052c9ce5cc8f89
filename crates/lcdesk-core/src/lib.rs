//! Domain model and ports for the LCDesk workflow.
//!
//! This crate has no I/O of its own: the external services are reached
//! through the [`gateway`] and [`snapshot`] ports, implemented by the
//! client and infrastructure crates.

pub mod config;
pub mod document;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod session;
pub mod snapshot;
pub mod text;
pub mod upload;
pub mod vessel;
pub mod workflow;

// Re-export the shared error type
pub use error::{Error, Result};
