//! Port for the durable local session snapshot.
//!
//! The snapshot survives restarts so the operator's current context can
//! be reconstructed without a re-fetch. It is advisory only: writes are
//! last-write-wins and readers must tolerate staleness; the processing
//! service remains the system of record.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::Session;

/// Upper bound on the stored recent-sessions list.
pub const RECENT_SESSIONS_LIMIT: usize = 5;

/// Local persistence for the current and recent session snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Persists the selection and pushes it to the front of the recent
    /// list (deduplicated by id, bounded by [`RECENT_SESSIONS_LIMIT`]).
    async fn set_current_session(&self, session: &Session) -> Result<()>;

    async fn clear_current_session(&self) -> Result<()>;

    /// Most recent first.
    async fn recent_sessions(&self) -> Result<Vec<Session>>;

    /// Drops a deleted session from both the current snapshot and the
    /// recent list.
    async fn remove_session(&self, session_id: &str) -> Result<()>;
}
