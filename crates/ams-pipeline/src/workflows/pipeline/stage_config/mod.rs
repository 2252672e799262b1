//! Stage configuration dispatch.
//!
//! Every stage carries an explicit [`StageType`] chosen when its template was created. The
//! type selects one [`StageSettings`] variant, and saving a configuration derives the stage
//! status from the variant's required fields.

pub mod forms;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{
    Interviewer, PipelineError, SchedulingInfo, Stage, StageId, StageStatus, TaAssignment,
};
use forms::{
    AptitudeTestSettings, BackgroundVerificationSettings, ClientInterviewSettings,
    CustomStageSettings, HygieneScreeningSettings, InterviewFormat, InterviewSettings,
    PhoneScreeningSettings, VendorPartnerInterviewSettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageType {
    PhoneScreening,
    HygieneScreening,
    BackgroundVerification,
    Interview,
    ClientInterview,
    VendorPartnerInterview,
    AptitudeTest,
    #[serde(other)]
    Custom,
}

impl StageType {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::PhoneScreening,
            Self::HygieneScreening,
            Self::BackgroundVerification,
            Self::Interview,
            Self::ClientInterview,
            Self::VendorPartnerInterview,
            Self::AptitudeTest,
            Self::Custom,
        ]
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::PhoneScreening => "phone-screening",
            Self::HygieneScreening => "hygiene-screening",
            Self::BackgroundVerification => "background-verification",
            Self::Interview => "interview",
            Self::ClientInterview => "client-interview",
            Self::VendorPartnerInterview => "vendor-partner-interview",
            Self::AptitudeTest => "aptitude-test",
            Self::Custom => "custom",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PhoneScreening => "Phone Screening",
            Self::HygieneScreening => "Hygiene Screening",
            Self::BackgroundVerification => "Background Verification",
            Self::Interview => "Interview",
            Self::ClientInterview => "Client Interview",
            Self::VendorPartnerInterview => "Vendor/Partner Interview",
            Self::AptitudeTest => "Aptitude Test",
            Self::Custom => "Custom Stage",
        }
    }

    /// Resolve a type tag. Unmapped tags fall through to [`StageType::Custom`].
    pub fn from_tag(raw: &str) -> Self {
        let tag = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|stage_type| stage_type.tag() == tag)
            .unwrap_or(Self::Custom)
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// First match wins. A name containing "screening" resolves to a phone screen even when it
// also says "hygiene"; "client" precedes the generic "interview" rule.
const STAGE_TYPE_KEYWORDS: &[(StageType, &[&str])] = &[
    (StageType::PhoneScreening, &["phone", "screening"]),
    (StageType::HygieneScreening, &["hygiene"]),
    (
        StageType::BackgroundVerification,
        &["background", "verification"],
    ),
    (StageType::ClientInterview, &["client"]),
    (StageType::VendorPartnerInterview, &["vendor", "partner"]),
    (StageType::AptitudeTest, &["aptitude", "test"]),
    (StageType::Interview, &["interview"]),
];

/// Infer a stage type from a free-text stage name.
///
/// Only used for templates that arrive without an explicit type, such as catalog rows
/// imported from a spreadsheet.
pub fn infer_stage_type(stage_name: &str) -> StageType {
    let name = stage_name.to_lowercase();
    STAGE_TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| name.contains(keyword)))
        .map(|(stage_type, _)| *stage_type)
        .unwrap_or(StageType::Custom)
}

/// Type-specific settings. The `stage_type` field is the discriminant on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage_type", rename_all = "kebab-case")]
pub enum StageSettings {
    PhoneScreening(PhoneScreeningSettings),
    HygieneScreening(HygieneScreeningSettings),
    BackgroundVerification(BackgroundVerificationSettings),
    Interview(InterviewSettings),
    ClientInterview(ClientInterviewSettings),
    VendorPartnerInterview(VendorPartnerInterviewSettings),
    AptitudeTest(AptitudeTestSettings),
    Custom(CustomStageSettings),
}

impl StageSettings {
    /// Default seed for a freshly opened form.
    pub fn seed(stage_type: StageType) -> Self {
        match stage_type {
            StageType::PhoneScreening => Self::PhoneScreening(Default::default()),
            StageType::HygieneScreening => Self::HygieneScreening(Default::default()),
            StageType::BackgroundVerification => Self::BackgroundVerification(Default::default()),
            StageType::Interview => Self::Interview(Default::default()),
            StageType::ClientInterview => Self::ClientInterview(Default::default()),
            StageType::VendorPartnerInterview => Self::VendorPartnerInterview(Default::default()),
            StageType::AptitudeTest => Self::AptitudeTest(Default::default()),
            StageType::Custom => Self::Custom(Default::default()),
        }
    }

    pub fn stage_type(&self) -> StageType {
        match self {
            Self::PhoneScreening(_) => StageType::PhoneScreening,
            Self::HygieneScreening(_) => StageType::HygieneScreening,
            Self::BackgroundVerification(_) => StageType::BackgroundVerification,
            Self::Interview(_) => StageType::Interview,
            Self::ClientInterview(_) => StageType::ClientInterview,
            Self::VendorPartnerInterview(_) => StageType::VendorPartnerInterview,
            Self::AptitudeTest(_) => StageType::AptitudeTest,
            Self::Custom(_) => StageType::Custom,
        }
    }

    pub fn interviewers(&self) -> &[Interviewer] {
        match self {
            Self::PhoneScreening(settings) => &settings.interviewers,
            Self::HygieneScreening(settings) => &settings.interviewers,
            Self::BackgroundVerification(settings) => &settings.interviewers,
            Self::Interview(settings) => &settings.interviewers,
            Self::ClientInterview(settings) => &settings.interviewers,
            Self::VendorPartnerInterview(settings) => &settings.interviewers,
            Self::AptitudeTest(settings) => &settings.interviewers,
            Self::Custom(settings) => &settings.interviewers,
        }
    }

    pub fn interviewers_mut(&mut self) -> &mut Vec<Interviewer> {
        match self {
            Self::PhoneScreening(settings) => &mut settings.interviewers,
            Self::HygieneScreening(settings) => &mut settings.interviewers,
            Self::BackgroundVerification(settings) => &mut settings.interviewers,
            Self::Interview(settings) => &mut settings.interviewers,
            Self::ClientInterview(settings) => &mut settings.interviewers,
            Self::VendorPartnerInterview(settings) => &mut settings.interviewers,
            Self::AptitudeTest(settings) => &mut settings.interviewers,
            Self::Custom(settings) => &mut settings.interviewers,
        }
    }

    /// Interview format for variants that have one.
    pub fn interview_format(&self) -> Option<InterviewFormat> {
        match self {
            Self::PhoneScreening(settings) => settings.interview_format,
            Self::HygieneScreening(settings) => settings.interview_format,
            Self::Interview(settings) => settings.interview_format,
            Self::ClientInterview(settings) => settings.interview_format,
            Self::VendorPartnerInterview(settings) => settings.interview_format,
            Self::Custom(settings) => settings.interview_format,
            Self::BackgroundVerification(_) | Self::AptitudeTest(_) => None,
        }
    }

    fn assignee_label(&self) -> &'static str {
        match self {
            Self::BackgroundVerification(_) => "Verification owner",
            Self::AptitudeTest(_) => "Evaluators",
            _ => "Interviewers",
        }
    }

    /// Label of the variant's required detail when it has not been filled in.
    fn missing_detail(&self) -> Option<&'static str> {
        match self {
            Self::BackgroundVerification(settings) => {
                settings.sla_date.is_none().then_some("SLA date")
            }
            Self::AptitudeTest(settings) => settings
                .test_platform
                .as_deref()
                .map_or(true, |platform| platform.trim().is_empty())
                .then_some("Test platform"),
            other => other
                .interview_format()
                .is_none()
                .then_some("Interview format"),
        }
    }
}

/// Configuration payload attached to a stage once its form has been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(flatten)]
    pub settings: StageSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_configured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<SchedulingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ta_assigned: Option<TaAssignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl StageConfig {
    pub fn seed(stage_type: StageType) -> Self {
        Self::from_settings(StageSettings::seed(stage_type))
    }

    pub fn from_settings(settings: StageSettings) -> Self {
        Self {
            settings,
            notes: None,
            is_configured: false,
            scheduling: None,
            ta_assigned: None,
            due_date: None,
        }
    }

    pub fn stage_type(&self) -> StageType {
        self.settings.stage_type()
    }

    /// Derive the status and outstanding items this configuration would give its stage.
    pub fn assess(&self) -> ConfigAssessment {
        let mut missing_items = Vec::new();
        if self.settings.interviewers().is_empty() {
            missing_items.push(self.settings.assignee_label().to_string());
        }
        if let Some(detail) = self.settings.missing_detail() {
            missing_items.push(detail.to_string());
        }

        let status = if missing_items.is_empty() {
            StageStatus::Configured
        } else {
            StageStatus::PartiallyConfigured
        };

        ConfigAssessment {
            status,
            missing_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigAssessment {
    pub status: StageStatus,
    pub missing_items: Vec<String>,
}

/// Open the configuration form for a stage.
///
/// Returns `None` when there is no stage. An existing configuration of the stage's own type
/// is returned as-is; otherwise the type's seed is prefilled from the stage's current
/// assignments.
pub fn open_config_form(stage: Option<&Stage>) -> Option<StageConfig> {
    let stage = stage?;

    if let Some(existing) = stage
        .config
        .as_ref()
        .filter(|config| config.stage_type() == stage.stage_type)
    {
        return Some(existing.clone());
    }

    let mut config = StageConfig::seed(stage.stage_type);
    config
        .settings
        .interviewers_mut()
        .clone_from(&stage.interviewers);
    config.scheduling = Some(stage.scheduling.clone());
    config.ta_assigned = stage.ta_assigned.clone();
    config.due_date = stage.due_date;
    Some(config)
}

/// Merge a saved configuration into the matching stage and recompute its status.
pub fn save_config(
    stages: &[Stage],
    stage_id: &StageId,
    config: StageConfig,
) -> Result<Vec<Stage>, PipelineError> {
    let position = stages
        .iter()
        .position(|stage| &stage.id == stage_id)
        .ok_or_else(|| PipelineError::StageNotFound(stage_id.clone()))?;

    let mut updated = stages.to_vec();
    apply_config(&mut updated[position], config)?;
    Ok(updated)
}

pub(crate) fn apply_config(
    stage: &mut Stage,
    mut config: StageConfig,
) -> Result<(), PipelineError> {
    if config.stage_type() != stage.stage_type {
        return Err(PipelineError::StageTypeMismatch {
            stage_id: stage.id.clone(),
            expected: stage.stage_type,
            received: config.stage_type(),
        });
    }

    let assessment = config.assess();
    config.is_configured = assessment.status == StageStatus::Configured;

    stage.interviewers = config.settings.interviewers().to_vec();
    if let Some(scheduling) = &config.scheduling {
        stage.scheduling = scheduling.clone();
    }
    stage.ta_assigned = config.ta_assigned.clone();
    stage.due_date = config.due_date;
    stage.status = assessment.status;
    stage.missing_items = assessment.missing_items;
    stage.config = Some(config);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keyword_takes_precedence_over_interview() {
        assert_eq!(
            infer_stage_type("Client Interview - Final Round"),
            StageType::ClientInterview
        );
    }

    #[test]
    fn unmatched_names_are_custom() {
        assert_eq!(infer_stage_type("Quarterly Planning"), StageType::Custom);
    }

    #[test]
    fn keyword_rules_cover_each_type() {
        let cases = [
            ("Phone Screen", StageType::PhoneScreening),
            ("Initial Screening", StageType::PhoneScreening),
            ("Hygiene Check", StageType::HygieneScreening),
            ("Hygiene Screening", StageType::PhoneScreening),
            ("Background Check", StageType::BackgroundVerification),
            ("Document Verification", StageType::BackgroundVerification),
            ("Vendor Round", StageType::VendorPartnerInterview),
            ("Partner Interview", StageType::VendorPartnerInterview),
            ("Aptitude Round", StageType::AptitudeTest),
            ("Coding Test", StageType::AptitudeTest),
            ("Technical Interview", StageType::Interview),
        ];

        for (name, expected) in cases {
            assert_eq!(infer_stage_type(name), expected, "name: {name}");
        }
    }

    #[test]
    fn unknown_tags_fall_through_to_custom() {
        assert_eq!(StageType::from_tag("aptitude-test"), StageType::AptitudeTest);
        assert_eq!(StageType::from_tag("panel-review"), StageType::Custom);

        let parsed: StageType =
            serde_json::from_str("\"panel-review\"").expect("unknown tag deserializes");
        assert_eq!(parsed, StageType::Custom);
    }

    #[test]
    fn seeds_match_their_stage_type() {
        for stage_type in StageType::ordered() {
            assert_eq!(StageSettings::seed(stage_type).stage_type(), stage_type);
        }
    }

    #[test]
    fn assessment_lists_missing_items() {
        let config = StageConfig::seed(StageType::Interview);
        let assessment = config.assess();
        assert_eq!(assessment.status, StageStatus::PartiallyConfigured);
        assert_eq!(
            assessment.missing_items,
            vec!["Interviewers".to_string(), "Interview format".to_string()]
        );

        let config = StageConfig::seed(StageType::BackgroundVerification);
        assert_eq!(
            config.assess().missing_items,
            vec!["Verification owner".to_string(), "SLA date".to_string()]
        );
    }

    #[test]
    fn config_round_trips_with_flattened_tag() {
        let json = serde_json::json!({
            "stage_type": "aptitude-test",
            "test_platform": "Codility",
            "duration": "90",
            "notes": "Send the link a day early",
        });

        let config: StageConfig = serde_json::from_value(json).expect("config parses");
        assert_eq!(config.stage_type(), StageType::AptitudeTest);
        assert_eq!(config.notes.as_deref(), Some("Send the link a day early"));
        match &config.settings {
            StageSettings::AptitudeTest(settings) => {
                assert_eq!(settings.duration, 90);
                assert_eq!(settings.test_platform.as_deref(), Some("Codility"));
            }
            other => panic!("expected aptitude settings, got {other:?}"),
        }

        let value = serde_json::to_value(&config).expect("config serializes");
        assert_eq!(value["stage_type"], "aptitude-test");
        assert_eq!(value["result_source"], "auto");
    }
}
