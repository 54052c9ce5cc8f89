//! Read-only lifecycle template catalog.
//!
//! Lifecycle definitions change rarely; they are fetched once per
//! process and served from memory afterwards.

use std::sync::Arc;
use tokio::sync::OnceCell;

use lcdesk_core::error::Result;
use lcdesk_core::gateway::ProcessingGateway;
use lcdesk_core::lifecycle::LifecycleDefinition;

pub struct LifecycleCatalog {
    gateway: Arc<dyn ProcessingGateway>,
    cache: OnceCell<Vec<LifecycleDefinition>>,
}

impl LifecycleCatalog {
    pub fn new(gateway: Arc<dyn ProcessingGateway>) -> Self {
        Self {
            gateway,
            cache: OnceCell::new(),
        }
    }

    /// All lifecycle definitions, fetched on first use.
    pub async fn all(&self) -> Result<Vec<LifecycleDefinition>> {
        let definitions = self
            .cache
            .get_or_try_init(|| self.gateway.list_lifecycles())
            .await?;
        Ok(definitions.clone())
    }

    /// Distinct instrument names, in catalog order.
    pub async fn instruments(&self) -> Result<Vec<String>> {
        let mut instruments: Vec<String> = Vec::new();
        for definition in self.all().await? {
            if !instruments.contains(&definition.instrument) {
                instruments.push(definition.instrument);
            }
        }
        Ok(instruments)
    }

    /// Transitions available under one instrument.
    pub async fn transitions_for(&self, instrument: &str) -> Result<Vec<LifecycleDefinition>> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|d| d.instrument == instrument)
            .collect())
    }
}
