//! Session management use case.
//!
//! Holds the client-side session list and the current selection. The
//! processing service is the system of record; the local snapshot is
//! advisory, so snapshot failures degrade to a warning instead of
//! failing the operation that triggered them.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use lcdesk_core::error::{Error, Result};
use lcdesk_core::gateway::ProcessingGateway;
use lcdesk_core::session::{CustomerRecord, NewSession, Session};
use lcdesk_core::snapshot::SnapshotStore;

/// Use case for session CRUD and selection.
pub struct SessionStore {
    gateway: Arc<dyn ProcessingGateway>,
    snapshots: Arc<dyn SnapshotStore>,
    sessions: RwLock<Vec<Session>>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new(gateway: Arc<dyn ProcessingGateway>, snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self {
            gateway,
            snapshots,
            sessions: RwLock::new(Vec::new()),
            current: RwLock::new(None),
        }
    }

    /// Refreshes the session list from the service.
    ///
    /// When the fetch fails and a previously loaded list exists, the
    /// stale list is returned with a warning; an empty cache propagates
    /// the error.
    pub async fn load_sessions(&self) -> Result<Vec<Session>> {
        match self.gateway.list_sessions().await {
            Ok(sessions) => {
                *self.sessions.write().await = sessions.clone();
                Ok(sessions)
            }
            Err(err) => {
                let cached = self.sessions.read().await;
                if cached.is_empty() {
                    Err(err)
                } else {
                    warn!(
                        "[SessionStore] session refresh failed ({}), serving {} cached",
                        err,
                        cached.len()
                    );
                    Ok(cached.clone())
                }
            }
        }
    }

    /// Creates a session and its linked customer record, then selects
    /// it as current.
    ///
    /// The two service calls are not atomic. When the customer link
    /// fails, the session still exists on the service and stays in the
    /// local list; the returned `CustomerLink` error names it.
    pub async fn create_session(&self, payload: &NewSession) -> Result<Session> {
        let payload = payload.trimmed();
        payload.validate()?;

        let session = self.gateway.create_session(&payload).await?;
        info!(
            "[SessionStore] created session {} (LC {})",
            session.id, session.lc_number
        );
        self.sessions.write().await.push(session.clone());
        self.remember(&session).await;

        let customer = CustomerRecord::linked_to(&session, &payload);
        if let Err(err) = self.gateway.save_customer(&customer).await {
            return Err(Error::CustomerLink {
                session_id: session.id.clone(),
                source: Box::new(err),
            });
        }

        Ok(session)
    }

    /// Selects a session by id, from the cache or after a refresh.
    pub async fn set_current(&self, session_id: &str) -> Result<Session> {
        let session = match self.find(session_id).await {
            Some(session) => session,
            None => {
                let refreshed = self.load_sessions().await?;
                refreshed
                    .into_iter()
                    .find(|s| s.id == session_id)
                    .ok_or(Error::NoSessionSelected)?
            }
        };
        self.remember(&session).await;
        Ok(session)
    }

    /// The currently selected session: memory first, then the durable
    /// snapshot (restoring it into memory on a hit).
    pub async fn current_session(&self) -> Result<Option<Session>> {
        if let Some(session) = self.current.read().await.clone() {
            return Ok(Some(session));
        }
        match self.snapshots.current_session().await {
            Ok(Some(session)) => {
                *self.current.write().await = Some(session.clone());
                Ok(Some(session))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                warn!("[SessionStore] snapshot read failed: {}", err);
                Ok(None)
            }
        }
    }

    pub async fn clear_current(&self) -> Result<()> {
        *self.current.write().await = None;
        if let Err(err) = self.snapshots.clear_current_session().await {
            warn!("[SessionStore] snapshot clear failed: {}", err);
        }
        Ok(())
    }

    /// Deletes a session, refusing `completed` ones before any network
    /// call is made.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let session = match self.find(session_id).await {
            Some(session) => Some(session),
            None => self
                .load_sessions()
                .await?
                .into_iter()
                .find(|s| s.id == session_id),
        };

        if let Some(session) = &session {
            if !session.status.is_deletable() {
                return Err(Error::DeleteForbidden {
                    id: session_id.to_string(),
                    status: session.status.to_string(),
                });
            }
        }

        self.gateway.delete_session(session_id).await?;
        info!("[SessionStore] deleted session {}", session_id);

        self.sessions.write().await.retain(|s| s.id != session_id);
        {
            let mut current = self.current.write().await;
            if current.as_ref().is_some_and(|s| s.id == session_id) {
                *current = None;
            }
        }
        if let Err(err) = self.snapshots.remove_session(session_id).await {
            warn!("[SessionStore] snapshot cleanup failed: {}", err);
        }
        Ok(())
    }

    /// Pre-fill lookup for the creation form. With neither key present
    /// no call is made and `None` comes back.
    pub async fn prefill_customer(
        &self,
        cif_number: Option<&str>,
        customer_id: Option<&str>,
    ) -> Result<Option<CustomerRecord>> {
        let cif_number = cif_number.map(str::trim).filter(|v| !v.is_empty());
        let customer_id = customer_id.map(str::trim).filter(|v| !v.is_empty());
        if cif_number.is_none() && customer_id.is_none() {
            return Ok(None);
        }
        self.gateway.get_customer(cif_number, customer_id).await
    }

    /// Recently selected sessions, most recent first.
    pub async fn recent_sessions(&self) -> Result<Vec<Session>> {
        self.snapshots.recent_sessions().await
    }

    async fn find(&self, session_id: &str) -> Option<Session> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }

    /// Commits a selection to memory and, best-effort, to the snapshot.
    async fn remember(&self, session: &Session) {
        *self.current.write().await = Some(session.clone());
        if let Err(err) = self.snapshots.set_current_session(session).await {
            warn!("[SessionStore] snapshot write failed: {}", err);
        }
    }
}
