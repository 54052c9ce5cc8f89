//! `lcdesk lifecycles` command.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use lcdesk_application::LifecycleCatalog;

use super::App;

pub async fn run(app: &App, instrument: Option<String>) -> Result<()> {
    let catalog = LifecycleCatalog::new(Arc::clone(&app.gateway));
    let definitions = match instrument.as_deref() {
        Some(instrument) => catalog.transitions_for(instrument).await?,
        None => catalog.all().await?,
    };

    if definitions.is_empty() {
        println!("no lifecycle templates");
        return Ok(());
    }
    for definition in &definitions {
        println!("{:<4} {}", definition.id, definition.full_name().bold());
        if !definition.required_documents.is_empty() {
            println!("     documents: {}", definition.required_documents.join(", "));
        }
    }
    Ok(())
}
