use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a financing application.
///
/// Every status has a canonical persisted form (`Completa`) and possibly one
/// or more legacy forms (`submitted`) still found in older rows. Both parse to
/// the same variant; serialization always writes the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApplicationStatus {
    Borrador,
    Completa,
    FaltanDocumentos,
    EnRevision,
    Aprobada,
    Rechazada,
}

impl ApplicationStatus {
    pub const fn canonical(self) -> &'static str {
        match self {
            ApplicationStatus::Borrador => "Borrador",
            ApplicationStatus::Completa => "Completa",
            ApplicationStatus::FaltanDocumentos => "Faltan Documentos",
            ApplicationStatus::EnRevision => "En Revisión",
            ApplicationStatus::Aprobada => "Aprobada",
            ApplicationStatus::Rechazada => "Rechazada",
        }
    }

    pub const fn legacy_aliases(self) -> &'static [&'static str] {
        match self {
            ApplicationStatus::Borrador => &["draft"],
            ApplicationStatus::Completa => &["submitted"],
            ApplicationStatus::FaltanDocumentos => &["pending_docs"],
            ApplicationStatus::EnRevision => &["reviewing", "in_review"],
            ApplicationStatus::Aprobada => &["approved"],
            ApplicationStatus::Rechazada => &["rejected"],
        }
    }

    pub const fn ordered() -> [ApplicationStatus; 6] {
        [
            ApplicationStatus::Borrador,
            ApplicationStatus::Completa,
            ApplicationStatus::FaltanDocumentos,
            ApplicationStatus::EnRevision,
            ApplicationStatus::Aprobada,
            ApplicationStatus::Rechazada,
        ]
    }

    /// Resolve a persisted string in either canonical or legacy form.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ordered().into_iter().find(|status| {
            status.canonical() == trimmed || status.legacy_aliases().contains(&trimmed)
        })
    }

    /// Triage rank; lower sorts first.
    pub const fn sort_priority(self) -> u8 {
        match self {
            ApplicationStatus::FaltanDocumentos => 1,
            ApplicationStatus::Completa => 2,
            ApplicationStatus::EnRevision => 3,
            ApplicationStatus::Aprobada => 4,
            ApplicationStatus::Borrador => 5,
            ApplicationStatus::Rechazada => 6,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Aprobada | ApplicationStatus::Rechazada)
    }

    pub const fn config(self) -> StatusConfig {
        match self {
            ApplicationStatus::Borrador => StatusConfig {
                label: "Borrador",
                color: StatusColor::Gray,
                description: "La solicitud está en proceso de llenado",
            },
            ApplicationStatus::Completa => StatusConfig {
                label: "Completa",
                color: StatusColor::Green,
                description: "Solicitud completa con todos los documentos",
            },
            ApplicationStatus::FaltanDocumentos => StatusConfig {
                label: "Faltan Documentos",
                color: StatusColor::Yellow,
                description: "Solicitud enviada pero faltan documentos requeridos",
            },
            ApplicationStatus::EnRevision => StatusConfig {
                label: "En Revisión",
                color: StatusColor::Purple,
                description: "La solicitud está siendo revisada",
            },
            ApplicationStatus::Aprobada => StatusConfig {
                label: "Aprobada",
                color: StatusColor::Green,
                description: "Solicitud aprobada",
            },
            ApplicationStatus::Rechazada => StatusConfig {
                label: "Rechazada",
                color: StatusColor::Red,
                description: "Solicitud rechazada",
            },
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            ApplicationStatus::Borrador => "📝",
            ApplicationStatus::Completa => "✅",
            ApplicationStatus::FaltanDocumentos => "⚠️",
            ApplicationStatus::EnRevision => "👀",
            ApplicationStatus::Aprobada => "🎉",
            ApplicationStatus::Rechazada => "❌",
        }
    }

    /// Message announced to staff after the status changes.
    pub const fn feedback(self) -> StatusFeedback {
        match self {
            ApplicationStatus::Borrador => StatusFeedback {
                title: "📝 Solicitud en Borrador",
                description: "La solicitud regresó a borrador.",
                tone: FeedbackTone::Info,
                display_ms: DEFAULT_FEEDBACK_MS,
            },
            ApplicationStatus::Completa => StatusFeedback {
                title: "✅ Solicitud marcada como Completa",
                description: "Asegúrate de que todos los documentos estén presentes.",
                tone: FeedbackTone::Success,
                display_ms: DEFAULT_FEEDBACK_MS,
            },
            ApplicationStatus::FaltanDocumentos => StatusFeedback {
                title: "⚠️ Faltan Documentos",
                description: "Contacta al cliente para solicitar los documentos faltantes.",
                tone: FeedbackTone::Warning,
                display_ms: 6_000,
            },
            ApplicationStatus::EnRevision => StatusFeedback {
                title: "📋 En Revisión",
                description: "La solicitud está siendo revisada.",
                tone: FeedbackTone::Info,
                display_ms: DEFAULT_FEEDBACK_MS,
            },
            ApplicationStatus::Aprobada => StatusFeedback {
                title: "🎉 Solicitud Aprobada",
                description: "Contacta al cliente para informarle de la aprobación.",
                tone: FeedbackTone::Success,
                display_ms: DEFAULT_FEEDBACK_MS,
            },
            ApplicationStatus::Rechazada => StatusFeedback {
                title: "❌ Solicitud Rechazada",
                description: "Contacta al cliente para explicar la situación.",
                tone: FeedbackTone::Error,
                display_ms: DEFAULT_FEEDBACK_MS,
            },
        }
    }
}

const DEFAULT_FEEDBACK_MS: u32 = 4_000;

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized application status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.canonical().to_string()
    }
}

/// Applications that count as live pipeline work.
pub const ACTIVE: [ApplicationStatus; 4] = [
    ApplicationStatus::Completa,
    ApplicationStatus::FaltanDocumentos,
    ApplicationStatus::EnRevision,
    ApplicationStatus::Aprobada,
];

pub const IN_PROGRESS: [ApplicationStatus; 3] = [
    ApplicationStatus::Completa,
    ApplicationStatus::FaltanDocumentos,
    ApplicationStatus::EnRevision,
];

pub const DASHBOARD: [ApplicationStatus; 5] = [
    ApplicationStatus::Completa,
    ApplicationStatus::FaltanDocumentos,
    ApplicationStatus::EnRevision,
    ApplicationStatus::Aprobada,
    ApplicationStatus::Rechazada,
];

/// Statuses staff pick while an application is still being worked.
pub const WORKFLOW_STATUSES: [ApplicationStatus; 4] = [
    ApplicationStatus::Borrador,
    ApplicationStatus::FaltanDocumentos,
    ApplicationStatus::Completa,
    ApplicationStatus::EnRevision,
];

pub const DECISION_STATUSES: [ApplicationStatus; 2] =
    [ApplicationStatus::Aprobada, ApplicationStatus::Rechazada];

/// Which half of the status picker a status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusGroup {
    Workflow,
    Decision,
}

impl StatusGroup {
    pub fn members(self) -> &'static [ApplicationStatus] {
        match self {
            StatusGroup::Workflow => &WORKFLOW_STATUSES,
            StatusGroup::Decision => &DECISION_STATUSES,
        }
    }
}

impl ApplicationStatus {
    pub fn group(self) -> StatusGroup {
        if DECISION_STATUSES.contains(&self) {
            StatusGroup::Decision
        } else {
            StatusGroup::Workflow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Gray,
    Green,
    Yellow,
    Purple,
    Red,
}

/// Display entry shared by a status and all of its aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusConfig {
    pub label: &'static str,
    pub color: StatusColor,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTone {
    Success,
    Warning,
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusFeedback {
    pub title: &'static str,
    pub description: &'static str,
    pub tone: FeedbackTone,
    pub display_ms: u32,
}

/// A persisted status string, kept verbatim, together with what it resolves to.
///
/// Unrecognized strings are carried as [`ResolvedStatus::Unknown`] and render
/// with a neutral fallback instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResolvedStatus {
    Known {
        status: ApplicationStatus,
        raw: String,
    },
    Unknown(String),
}

/// Display entry for a status string the model does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayConfig {
    pub label: String,
    pub color: StatusColor,
    pub description: String,
}

impl ResolvedStatus {
    pub fn resolve(raw: &str) -> Self {
        match ApplicationStatus::parse(raw) {
            Some(status) => ResolvedStatus::Known {
                status,
                raw: raw.to_string(),
            },
            None => ResolvedStatus::Unknown(raw.to_string()),
        }
    }

    pub fn known(&self) -> Option<ApplicationStatus> {
        match self {
            ResolvedStatus::Known { status, .. } => Some(*status),
            ResolvedStatus::Unknown(_) => None,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            ResolvedStatus::Known { raw, .. } => raw,
            ResolvedStatus::Unknown(raw) => raw,
        }
    }

    pub fn sort_priority(&self) -> u8 {
        self.known()
            .map(ApplicationStatus::sort_priority)
            .unwrap_or(UNKNOWN_SORT_PRIORITY)
    }

    pub fn display(&self) -> DisplayConfig {
        match self {
            ResolvedStatus::Known { status, .. } => {
                let config = status.config();
                DisplayConfig {
                    label: config.label.to_string(),
                    color: config.color,
                    description: config.description.to_string(),
                }
            }
            ResolvedStatus::Unknown(raw) => DisplayConfig {
                label: raw.clone(),
                color: StatusColor::Gray,
                description: raw.clone(),
            },
        }
    }

    pub fn emoji(&self) -> &'static str {
        self.known().map(ApplicationStatus::emoji).unwrap_or("❓")
    }

    pub fn is_in(&self, group: &[ApplicationStatus]) -> bool {
        self.known().map(|status| group.contains(&status)).unwrap_or(false)
    }
}

/// Unrecognized statuses sort after every known one.
pub const UNKNOWN_SORT_PRIORITY: u8 = 7;

impl From<ApplicationStatus> for ResolvedStatus {
    fn from(status: ApplicationStatus) -> Self {
        ResolvedStatus::Known {
            status,
            raw: status.canonical().to_string(),
        }
    }
}

impl From<String> for ResolvedStatus {
    fn from(raw: String) -> Self {
        ResolvedStatus::resolve(&raw)
    }
}

impl From<ResolvedStatus> for String {
    fn from(status: ResolvedStatus) -> Self {
        match status {
            ResolvedStatus::Known { raw, .. } => raw,
            ResolvedStatus::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ResolvedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}
