//! Command implementations and shared wiring.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use lcdesk_application::{ReviewPipeline, SessionStore, UploadCoordinator};
use lcdesk_client::{HttpProcessingGateway, VesselClient};
use lcdesk_core::config::AppConfig;
use lcdesk_core::gateway::ProcessingGateway;
use lcdesk_core::snapshot::SnapshotStore;
use lcdesk_infrastructure::{TomlSnapshotStore, paths};

pub mod lifecycles;
pub mod review;
pub mod sessions;
pub mod upload;
pub mod vessel;

/// Shared wiring for every command: configuration plus the two ports.
pub struct App {
    pub config: AppConfig,
    pub gateway: Arc<dyn ProcessingGateway>,
    pub snapshots: Arc<dyn SnapshotStore>,
}

impl App {
    pub fn bootstrap(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => paths::config_file()?,
        };
        let config = AppConfig::load(&config_path)
            .with_context(|| format!("loading configuration from {}", config_path.display()))?;
        debug!(
            "[App] configuration from {} (processing {}, vessel {})",
            config_path.display(),
            config.processing.base_url,
            config.vessel.base_url
        );

        let gateway: Arc<dyn ProcessingGateway> =
            Arc::new(HttpProcessingGateway::new(&config.processing));
        let snapshots: Arc<dyn SnapshotStore> = Arc::new(TomlSnapshotStore::default_location()?);

        Ok(Self {
            config,
            gateway,
            snapshots,
        })
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(self.gateway.clone(), self.snapshots.clone())
    }

    pub fn upload_coordinator(&self) -> UploadCoordinator {
        UploadCoordinator::new(self.gateway.clone(), self.config.processing.clone())
    }

    pub fn review_pipeline(&self, session_id: &str) -> ReviewPipeline {
        ReviewPipeline::new(
            self.gateway.clone(),
            session_id,
            self.config.review.reviewer.clone(),
        )
    }

    pub fn vessel_client(&self) -> VesselClient {
        VesselClient::new(&self.config.vessel)
    }

    /// Resolves the session a command targets: the explicit id when
    /// given, otherwise the current selection.
    pub async fn target_session(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(id) = explicit {
            return Ok(id.to_string());
        }
        let store = self.session_store();
        let current = store.current_session().await?;
        let current = current
            .ok_or(lcdesk_core::Error::NoSessionSelected)
            .context("run `lcdesk session use <id>` first")?;
        Ok(current.id)
    }
}

/// Asks for confirmation on stdin. Anything but `y`/`yes` declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
