//! HTTP clients for the external services.
//!
//! `HttpProcessingGateway` implements the `ProcessingGateway` port over
//! the document-processing service's JSON/REST contract;
//! `VesselClient` covers the vessel-tracking lookup. Wire DTOs keep the
//! services' field casing and are converted to domain types here, at
//! the boundary.

mod dto;
pub mod processing;
pub mod vessel;

pub use processing::HttpProcessingGateway;
pub use vessel::VesselClient;
