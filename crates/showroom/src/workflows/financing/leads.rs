use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::derivation::{compute_needs_action, derive_display_status};
use super::status::{ApplicationStatus, DisplayConfig, ResolvedStatus};

/// CRM lead row with the latest application status attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contacted: bool,
    #[serde(default)]
    pub latest_app_status: Option<String>,
    #[serde(default)]
    pub last_contact_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bank_profile: Option<serde_json::Value>,
}

/// Lead plus the flags the dashboards highlight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadView {
    #[serde(flatten)]
    pub lead: LeadRecord,
    pub corrected_status: Option<ResolvedStatus>,
    pub status_display: Option<DisplayConfig>,
    pub status_emoji: &'static str,
    pub is_submitted: bool,
    pub needs_action: bool,
    pub has_bank_profile: bool,
    pub last_contact: String,
}

impl LeadView {
    fn status_priority(&self) -> u8 {
        self.corrected_status
            .as_ref()
            .map(ResolvedStatus::sort_priority)
            .unwrap_or(super::status::UNKNOWN_SORT_PRIORITY)
    }
}

pub fn process_lead(lead: LeadRecord, now: DateTime<Utc>) -> LeadView {
    let corrected_status = lead
        .latest_app_status
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(derive_display_status);

    let known = corrected_status.as_ref().and_then(ResolvedStatus::known);
    let is_submitted = corrected_status.is_some() && known != Some(ApplicationStatus::Borrador);
    let needs_action = compute_needs_action(lead.contacted, known);
    let has_bank_profile = lead
        .bank_profile
        .as_ref()
        .map(|profile| !profile.is_null())
        .unwrap_or(false);

    LeadView {
        status_display: corrected_status.as_ref().map(ResolvedStatus::display),
        status_emoji: corrected_status
            .as_ref()
            .map(ResolvedStatus::emoji)
            .unwrap_or("❓"),
        last_contact: format_relative_time(lead.last_contact_at, now),
        corrected_status,
        is_submitted,
        needs_action,
        has_bank_profile,
        lead,
    }
}

/// Annotate every lead and sort for triage: leads needing action first, then by
/// status priority, then most recently contacted.
pub fn process_leads(leads: Vec<LeadRecord>, now: DateTime<Utc>) -> Vec<LeadView> {
    let mut views: Vec<LeadView> = leads
        .into_iter()
        .map(|lead| process_lead(lead, now))
        .collect();
    views.sort_by(triage_order);
    views
}

pub fn triage_order(a: &LeadView, b: &LeadView) -> Ordering {
    b.needs_action
        .cmp(&a.needs_action)
        .then_with(|| a.status_priority().cmp(&b.status_priority()))
        .then_with(|| b.lead.last_contact_at.cmp(&a.lead.last_contact_at))
}

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Short Spanish "time ago" label for a last-contact timestamp.
pub fn format_relative_time(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "Nunca".to_string();
    };

    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Ahora".to_string()
    } else if minutes < 60 {
        format!("Hace {minutes} min")
    } else if hours < 24 {
        format!("Hace {hours}h")
    } else if days < 7 {
        format!("Hace {days}d")
    } else {
        let month = MONTHS_ES[at.month0() as usize];
        format!("{} {month} {}", at.format("%d"), at.format("%Y %H:%M"))
    }
}
