//! `lcdesk review` subcommands.
//!
//! Each invocation opens the pipeline for the current session, loads
//! its drafts (selecting the first, or the one named with `--doc`),
//! and then performs the requested action.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::Colorize;

use lcdesk_application::ReviewPipeline;
use lcdesk_core::text::{normalize_display_name, parse_key_values};
use lcdesk_core::workflow::ReviewTab;

use super::{App, confirm};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// List the session's drafts
    Drafts,
    /// Show the tabs currently visible
    Tabs,
    /// Show one tab of the selected draft
    Show {
        /// draft | ocr | classification | final | summary
        tab: String,
        /// Review this draft instead of the first one
        #[arg(long)]
        doc: Option<String>,
    },
    /// Replace the text of one assembled page
    Edit {
        /// Document-type group within the assembled documents
        doc_type: String,
        page_no: u32,
        /// Replacement text
        #[arg(long)]
        text: String,
        #[arg(long)]
        doc: Option<String>,
    },
    /// Approve the reviewed document; irreversible
    Finalize {
        #[arg(long)]
        yes: bool,
        #[arg(long)]
        doc: Option<String>,
    },
    /// Show the published summary
    Summary {
        #[arg(long)]
        doc: Option<String>,
    },
    /// Show the versioned review-store head of the selected draft
    Inspect {
        #[arg(long)]
        doc: Option<String>,
    },
}

pub async fn run(app: &App, action: ReviewAction) -> Result<()> {
    let session_id = app.target_session(None).await?;
    let pipeline = app.review_pipeline(&session_id);
    pipeline.load_drafts().await?;

    match action {
        ReviewAction::Drafts => {
            let drafts = pipeline.drafts().await;
            if drafts.is_empty() {
                println!("no drafts yet; the service may still be processing");
            }
            let selected = pipeline.selected_doc_id().await;
            for draft in &drafts {
                let marker = if selected.as_deref() == Some(&draft.doc_id) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<10} {:<28} {}",
                    marker,
                    draft.doc_id.bold(),
                    draft.document_name,
                    draft.file_name()
                );
            }
        }
        ReviewAction::Tabs => {
            let active = pipeline.active_tab().await;
            for tab in pipeline.visible_tabs().await {
                let label = if tab == active {
                    tab.label().bold().to_string()
                } else {
                    tab.label().to_string()
                };
                println!("{label}");
            }
        }
        ReviewAction::Show { tab, doc } => {
            select(&pipeline, doc).await?;
            show_tab(&pipeline, &tab).await?;
        }
        ReviewAction::Edit {
            doc_type,
            page_no,
            text,
            doc,
        } => {
            select(&pipeline, doc).await?;
            pipeline.begin_edit(&doc_type, page_no).await?;
            pipeline.save_page_edit(&doc_type, page_no, &text).await?;
            println!(
                "saved {} page {}",
                normalize_display_name(&doc_type),
                page_no
            );
        }
        ReviewAction::Finalize { yes, doc } => {
            select(&pipeline, doc).await?;
            let doc_id = pipeline
                .selected_doc_id()
                .await
                .context("no draft selected")?;
            if !yes && !confirm(&format!("Finalize {doc_id}? This cannot be undone."))? {
                bail!("aborted");
            }
            pipeline.finalize().await?;
            println!("{} finalized; summary published", doc_id.bold());
        }
        ReviewAction::Summary { doc } => {
            select(&pipeline, doc).await?;
            show_tab(&pipeline, "summary").await?;
        }
        ReviewAction::Inspect { doc } => {
            select(&pipeline, doc).await?;
            let doc_id = pipeline
                .selected_doc_id()
                .await
                .context("no draft selected")?;
            match app.gateway.review_record(&doc_id).await? {
                Some(record) => {
                    println!("doc_id:  {}", record.doc_id.bold());
                    println!("status:  {}", record.status);
                    if let Some(version) = record.version {
                        println!("version: {version}");
                    }
                    let assembled =
                        lcdesk_core::document::AssembledDocuments::parse(&record.documents_json)?;
                    print_groups(&assembled);
                }
                None => println!("no review record yet for {doc_id}"),
            }
        }
    }
    Ok(())
}

async fn select(pipeline: &ReviewPipeline, doc: Option<String>) -> Result<()> {
    if let Some(doc_id) = doc {
        pipeline.select_draft(&doc_id).await?;
    }
    Ok(())
}

async fn show_tab(pipeline: &ReviewPipeline, tab: &str) -> Result<()> {
    match tab {
        "draft" => {
            let selected = pipeline.selected_doc_id().await;
            for draft in pipeline.drafts().await {
                if selected.as_deref() == Some(&draft.doc_id) {
                    println!("doc_id:    {}", draft.doc_id);
                    println!("name:      {}", draft.document_name);
                    println!("file:      {}", draft.file_name());
                    if let Some(at) = &draft.processed_at {
                        println!("processed: {at}");
                    }
                }
            }
        }
        "ocr" => {
            for page in pipeline.ocr_pages().await {
                println!("{}", format!("-- page {} --", page.page_no).bold());
                for line in key_value_lines(&page.extracted_text) {
                    println!("{line}");
                }
                if let Some(stamp) = &page.signature_stamp {
                    println!("signature/stamp: {stamp}");
                }
            }
        }
        "classification" => {
            for page in pipeline.classification_pages().await {
                println!(
                    "page {:<3} {:<8} {}",
                    page.page_no,
                    page.classified_code,
                    normalize_display_name(&page.classified_name)
                );
            }
        }
        "final" => {
            pipeline.set_active_tab(ReviewTab::FinalOcr).await?;
            print_assembled(pipeline).await;
        }
        "summary" => {
            pipeline.set_active_tab(ReviewTab::Summary).await?;
            let summary = pipeline.summary().await.context("no summary available")?;
            let assembled =
                lcdesk_core::document::AssembledDocuments::parse(&summary.documents_json)?;
            print_groups(&assembled);
            if let Some(at) = &summary.created_at {
                println!("published: {at}");
            }
        }
        other => bail!("unknown tab '{other}' (draft, ocr, classification, final, summary)"),
    }
    Ok(())
}

async fn print_assembled(pipeline: &ReviewPipeline) {
    let assembled = pipeline.assembled().await;
    if assembled.is_empty() {
        println!("nothing assembled yet");
        return;
    }
    print_groups(&assembled);
}

/// Renders assembled groups as key/value rows, re-parsed with the
/// colon heuristic.
fn print_groups(assembled: &lcdesk_core::document::AssembledDocuments) {
    for group in assembled.groups() {
        println!("{}", normalize_display_name(&group.name).bold().underline());
        for page in &group.pages {
            println!("  page {}", page.page_no);
            for line in key_value_lines(&page.text) {
                println!("    {line}");
            }
            if let Some(stamp) = &page.signature_stamp {
                println!("    signature/stamp: {stamp}");
            }
        }
    }
}

/// One rendered line per key/value row of a page's text.
fn key_value_lines(text: &str) -> Vec<String> {
    parse_key_values(text)
        .into_iter()
        .map(|row| match row.key {
            Some(key) => format!("{}: {}", key.bold(), row.value),
            None => row.value,
        })
        .collect()
}
