use chrono::{DateTime, Utc};
use clap::Args;
use showroom::error::AppError;
use showroom::workflows::financing::{process_leads, ApplicationStatus, LeadRecord, LeadView};
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug)]
pub(crate) struct TriageArgs {
    /// JSON array of lead rows
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Reference time for "last contact" labels (RFC 3339, defaults to now)
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Only list leads that need action
    #[arg(long)]
    pub(crate) actionable: bool,
}

pub(crate) fn run_triage(args: TriageArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.input)?;
    let leads: Vec<LeadRecord> = serde_json::from_str(&raw)?;
    debug!(count = leads.len(), "leads loaded");

    let now = args.now.unwrap_or_else(Utc::now);
    let views = process_leads(leads, now);
    let shown: Vec<&LeadView> = views
        .iter()
        .filter(|view| !args.actionable || view.needs_action)
        .collect();

    println!("Lead triage ({} of {})", shown.len(), views.len());
    for view in shown {
        println!("{}", render_lead(view));
    }
    Ok(())
}

pub(crate) fn render_lead(view: &LeadView) -> String {
    let status = view
        .status_display
        .as_ref()
        .map(|display| display.label.as_str())
        .unwrap_or("Sin solicitud");
    let flag = if view.needs_action { "!" } else { " " };
    let bank = if view.has_bank_profile { " [perfil bancario]" } else { "" };
    format!(
        "{flag} {} {:<24} {} {status} | {}{bank}",
        view.lead.id, view.lead.name, view.status_emoji, view.last_contact
    )
}

pub(crate) fn run_statuses() {
    println!(
        "{:<18} {:<8} {:<4} {:<9} {:<26} Description",
        "Status", "Color", "Rank", "Group", "Aliases"
    );
    for status in ApplicationStatus::ordered() {
        let config = status.config();
        println!(
            "{} {:<16} {:<8} {:<4} {:<9} {:<26} {}",
            status.emoji(),
            config.label,
            format!("{:?}", config.color).to_lowercase(),
            status.sort_priority(),
            format!("{:?}", status.group()).to_lowercase(),
            status.legacy_aliases().join(", "),
            config.description
        );
    }
}
