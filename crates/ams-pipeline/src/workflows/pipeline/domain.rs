use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::stage_config::{StageConfig, StageType};

/// Identifier of a stage instance within one pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(pub String);

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Organizational origin of a stage. Used for grouping and colour coding only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Internal,
    External,
    Partner,
    Client,
    Verification,
}

impl Category {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Internal,
            Self::External,
            Self::Partner,
            Self::Client,
            Self::Verification,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::External => "External",
            Self::Partner => "Partner",
            Self::Client => "Client",
            Self::Verification => "Verification",
        }
    }

    /// Colour token the flow view uses for the stage card accent.
    pub const fn accent(self) -> &'static str {
        match self {
            Self::Internal => "blue",
            Self::External => "purple",
            Self::Partner => "orange",
            Self::Client => "green",
            Self::Verification => "amber",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "internal" => Some(Self::Internal),
            "external" => Some(Self::External),
            "partner" => Some(Self::Partner),
            "client" => Some(Self::Client),
            "verification" => Some(Self::Verification),
            _ => None,
        }
    }
}

/// Catalog entry describing an addable, not yet instantiated stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTemplate {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub stage_type: StageType,
}

/// Interviewer referenced by a stage. Stages do not own interviewer identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interviewer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Interviewer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            avatar: None,
        }
    }
}

/// Talent acquisition recruiter responsible for a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaAssignment {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Scheduling details captured by the configuration form. `time_slot` and `date` are
/// stored as entered; nothing checks that they agree with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingInfo {
    #[serde(default)]
    pub is_scheduled: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::stage_config::forms::optional_minutes"
    )]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageStatus {
    NotConfigured,
    PartiallyConfigured,
    Configured,
}

impl StageStatus {
    pub const fn ordered() -> [Self; 3] {
        [
            Self::Configured,
            Self::PartiallyConfigured,
            Self::NotConfigured,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotConfigured => "Not Configured",
            Self::PartiallyConfigured => "Partially Configured",
            Self::Configured => "Configured",
        }
    }
}

/// A stage instance placed in a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub template_id: String,
    pub name: String,
    pub category: Category,
    pub stage_type: StageType,
    pub order: u32,
    pub status: StageStatus,
    #[serde(default)]
    pub interviewers: Vec<Interviewer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ta_assigned: Option<TaAssignment>,
    #[serde(default)]
    pub scheduling: SchedulingInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<StageConfig>,
}

impl Stage {
    /// Instantiate an unconfigured stage from a catalog template.
    pub fn from_template(template: &StageTemplate, id: StageId, order: u32) -> Self {
        Self {
            id,
            template_id: template.id.clone(),
            name: template.name.clone(),
            category: template.category,
            stage_type: template.stage_type,
            order,
            status: StageStatus::NotConfigured,
            interviewers: Vec::new(),
            ta_assigned: None,
            scheduling: SchedulingInfo::default(),
            due_date: None,
            missing_items: Vec::new(),
            config: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.status == StageStatus::Configured
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_configured() && self.due_date.is_some_and(|due| due < today)
    }
}

/// Failures raised by stage list operations that cannot degrade to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("stage {0} not found")]
    StageNotFound(StageId),
    #[error("stage {stage_id} expects {expected} settings, received {received}")]
    StageTypeMismatch {
        stage_id: StageId,
        expected: StageType,
        received: StageType,
    },
    #[error("stage {0} appears more than once")]
    DuplicateStage(StageId),
    #[error("stage id sequence would reissue {highest}: next value is {next}")]
    StaleSequence { next: u64, highest: u64 },
    #[error("stage order must run 1..N without gaps: expected {expected} at position {position}, found {found}")]
    OrderGap {
        position: usize,
        expected: u32,
        found: u32,
    },
}
