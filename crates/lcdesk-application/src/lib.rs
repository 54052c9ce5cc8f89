//! Use cases orchestrating the LCDesk workflow.
//!
//! Each use case owns its piece of client-side state behind interior
//! mutability and talks to the external services exclusively through
//! the ports defined in `lcdesk-core`, so every one of them is testable
//! against in-memory fakes.

pub mod lifecycle_catalog;
pub mod review;
pub mod session_store;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use lifecycle_catalog::LifecycleCatalog;
pub use review::ReviewPipeline;
pub use session_store::SessionStore;
pub use upload::UploadCoordinator;
