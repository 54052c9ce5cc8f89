//! `lcdesk session` subcommands.

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::{ColoredString, Colorize};
use std::str::FromStr;

use lcdesk_core::session::{NewSession, Session, SessionStatus};

use super::{App, confirm};

#[derive(Subcommand)]
pub enum SessionAction {
    /// List sessions on the processing service
    List {
        /// Only sessions with this status
        #[arg(long)]
        status: Option<String>,
    },
    /// Create a session and link its customer record
    Create {
        #[arg(long)]
        cif: String,
        #[arg(long)]
        customer_name: Option<String>,
        #[arg(long)]
        customer_type: Option<String>,
        #[arg(long)]
        lc: String,
        #[arg(long)]
        lifecycle: String,
        #[arg(long)]
        instrument: Option<String>,
        #[arg(long)]
        account_name: Option<String>,
        #[arg(long)]
        customer_id: Option<String>,
        /// Fill missing customer fields from the customer registry
        #[arg(long)]
        prefill: bool,
    },
    /// Select the current session
    Use { session_id: String },
    /// Show the current session
    Current,
    /// Recently selected sessions, most recent first
    Recent,
    /// Clear the current selection
    Clear,
    /// Delete a session (refused for completed ones)
    Delete {
        session_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub async fn run(app: &App, action: SessionAction) -> Result<()> {
    let store = app.session_store();
    match action {
        SessionAction::List { status } => {
            let filter = match status.as_deref() {
                Some(raw) => Some(
                    SessionStatus::from_str(raw)
                        .map_err(|_| anyhow::anyhow!("unknown status '{raw}'"))?,
                ),
                None => None,
            };
            let sessions = store.load_sessions().await?;
            let mut shown = 0;
            for session in &sessions {
                if filter.is_some_and(|f| f != session.status) {
                    continue;
                }
                print_session_line(session);
                shown += 1;
            }
            if shown == 0 {
                println!("no sessions");
            }
        }
        SessionAction::Create {
            cif,
            customer_name,
            customer_type,
            lc,
            lifecycle,
            instrument,
            account_name,
            customer_id,
            prefill,
        } => {
            let mut payload = NewSession {
                cif_number: cif,
                customer_id,
                customer_name: customer_name.unwrap_or_default(),
                account_name,
                customer_type: customer_type.unwrap_or_default(),
                lc_number: lc,
                instrument,
                lifecycle,
            };
            if prefill {
                apply_prefill(app, &mut payload).await?;
            }
            let session = store.create_session(&payload).await?;
            println!(
                "created session {} for {} ({})",
                session.id.bold(),
                session.customer_name,
                session.lc_number
            );
        }
        SessionAction::Use { session_id } => {
            let session = store.set_current(&session_id).await?;
            println!("current session is now {}", session.id.bold());
            print_session_line(&session);
        }
        SessionAction::Current => match store.current_session().await? {
            Some(session) => print_session_line(&session),
            None => println!("no session selected"),
        },
        SessionAction::Recent => {
            let recent = store.recent_sessions().await?;
            if recent.is_empty() {
                println!("no recent sessions");
            }
            for session in &recent {
                print_session_line(session);
            }
        }
        SessionAction::Clear => {
            store.clear_current().await?;
            println!("selection cleared");
        }
        SessionAction::Delete { session_id, yes } => {
            if !yes && !confirm(&format!("Delete session {session_id}?"))? {
                bail!("aborted");
            }
            store.delete_session(&session_id).await?;
            println!("deleted session {session_id}");
        }
    }
    Ok(())
}

/// Fills blank customer fields from the registry, keyed by CIF number
/// and/or customer id.
async fn apply_prefill(app: &App, payload: &mut NewSession) -> Result<()> {
    let store = app.session_store();
    let found = store
        .prefill_customer(Some(&payload.cif_number), payload.customer_id.as_deref())
        .await?;
    if let Some(customer) = found {
        if payload.customer_name.trim().is_empty() {
            payload.customer_name = customer.customer_name;
        }
        if payload.customer_type.trim().is_empty() {
            payload.customer_type = customer.customer_type;
        }
        if payload.account_name.is_none() {
            payload.account_name = customer.account_name;
        }
        if payload.customer_id.is_none() {
            payload.customer_id = customer.customer_id;
        }
    }
    Ok(())
}

fn print_session_line(session: &Session) {
    println!(
        "{:<10} {:<14} {:<24} {:<20} {:<12} {}",
        session.id,
        session.lc_number,
        session.customer_name,
        session.lifecycle,
        status_badge(session.status),
        session.created_at
    );
}

fn status_badge(status: SessionStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        SessionStatus::Created => text.cyan(),
        SessionStatus::Uploading | SessionStatus::Processing => text.yellow(),
        SessionStatus::Reviewing => text.magenta(),
        SessionStatus::Completed => text.green(),
        SessionStatus::Frozen => text.blue(),
    }
}
