//! `lcdesk upload` subcommands.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use lcdesk_core::upload::{FileDocument, PastedDocument, UploadBatch};

use super::App;

#[derive(Subcommand)]
pub enum UploadAction {
    /// Upload PDF or plain-text files
    Files {
        /// Target session (defaults to the current one)
        #[arg(long)]
        session: Option<String>,
        /// The main document
        #[arg(long)]
        main: Option<PathBuf>,
        /// Supporting documents, in order
        #[arg(long = "supporting", value_name = "PATH")]
        supporting: Vec<PathBuf>,
    },
    /// Submit pasted text documents, each given as NAME=FILE
    Text {
        #[arg(long)]
        session: Option<String>,
        /// The main document as NAME=FILE
        #[arg(long)]
        main: Option<String>,
        /// Supporting documents as NAME=FILE, in order
        #[arg(long = "supporting", value_name = "NAME=FILE")]
        supporting: Vec<String>,
    },
}

pub async fn run(app: &App, action: UploadAction) -> Result<()> {
    let coordinator = app.upload_coordinator();
    let (session_id, batch) = match action {
        UploadAction::Files {
            session,
            main,
            supporting,
        } => {
            let session_id = app.target_session(session.as_deref()).await?;
            let main = main.map(FileDocument::from_path).transpose()?;
            let supporting = supporting
                .into_iter()
                .map(FileDocument::from_path)
                .collect::<lcdesk_core::Result<Vec<_>>>()?;
            (session_id, UploadBatch::Files { main, supporting })
        }
        UploadAction::Text {
            session,
            main,
            supporting,
        } => {
            let session_id = app.target_session(session.as_deref()).await?;
            let main = main.as_deref().map(read_pasted).transpose()?;
            let supporting = supporting
                .iter()
                .map(|spec| read_pasted(spec))
                .collect::<Result<Vec<_>>>()?;
            (session_id, UploadBatch::Pasted { main, supporting })
        }
    };

    let outcome = coordinator.submit(&session_id, batch).await?;
    println!(
        "batch {} accepted, {} document(s):",
        outcome.batch_id,
        outcome.receipts.len()
    );
    for receipt in &outcome.receipts {
        println!(
            "  {} {} ({})",
            receipt.doc_id.bold(),
            receipt.document_name,
            receipt.status
        );
    }
    Ok(())
}

/// Parses a `NAME=FILE` spec and reads the file's text content.
fn read_pasted(spec: &str) -> Result<PastedDocument> {
    let (name, path) = spec
        .split_once('=')
        .with_context(|| format!("expected NAME=FILE, got '{spec}'"))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading pasted content from {path}"))?;
    Ok(PastedDocument {
        name: name.to_string(),
        content,
    })
}
