//! Field sets for each stage configuration variant, with their default seeds.
//!
//! Numeric fields are coerced the way the configuration form widgets coerce them: numbers
//! and numeric strings are accepted, anything else falls back to the field default.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::super::domain::Interviewer;

pub const DEFAULT_CALL_MINUTES: u32 = 30;
pub const DEFAULT_TEST_MINUTES: u32 = 60;
pub const DEFAULT_PASSING_SCORE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewFormat {
    InPerson,
    Video,
    Phone,
}

impl InterviewFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InPerson => "In Person",
            Self::Video => "Video",
            Self::Phone => "Phone",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    #[default]
    Technical,
    Hr,
    Managerial,
    Cultural,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    InProgress,
    Cleared,
    Flagged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultSource {
    #[default]
    Auto,
    Manual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestStatus {
    #[default]
    Pending,
    Sent,
    Completed,
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneScreeningSettings {
    pub interviewers: Vec<Interviewer>,
    #[serde(alias = "mode")]
    pub interview_format: Option<InterviewFormat>,
    #[serde(deserialize_with = "call_minutes")]
    pub call_duration: u32,
    pub screening_questions: Vec<String>,
}

impl Default for PhoneScreeningSettings {
    fn default() -> Self {
        Self {
            interviewers: Vec::new(),
            interview_format: Some(InterviewFormat::Phone),
            call_duration: DEFAULT_CALL_MINUTES,
            screening_questions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HygieneChecklist {
    pub resume_reviewed: bool,
    pub contact_verified: bool,
    pub notice_period_confirmed: bool,
    pub salary_expectation_confirmed: bool,
    pub location_confirmed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HygieneScreeningSettings {
    pub interviewers: Vec<Interviewer>,
    #[serde(alias = "mode")]
    pub interview_format: Option<InterviewFormat>,
    pub checklist: HygieneChecklist,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentChecklist {
    pub identity_proof: bool,
    pub address_proof: bool,
    pub education_certificates: bool,
    pub employment_records: bool,
    pub reference_letters: bool,
}

impl DocumentChecklist {
    pub fn outstanding(&self) -> Vec<&'static str> {
        [
            (self.identity_proof, "Identity proof"),
            (self.address_proof, "Address proof"),
            (self.education_certificates, "Education certificates"),
            (self.employment_records, "Employment records"),
            (self.reference_letters, "Reference letters"),
        ]
        .into_iter()
        .filter(|(uploaded, _)| !uploaded)
        .map(|(_, label)| label)
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundVerificationSettings {
    /// Verification owners. Counted as the stage's interviewers.
    pub interviewers: Vec<Interviewer>,
    pub agency: Option<String>,
    pub documents_uploaded: DocumentChecklist,
    pub verification_status: VerificationStatus,
    pub sla_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewSettings {
    pub interview_type: InterviewType,
    #[serde(alias = "mode")]
    pub interview_format: Option<InterviewFormat>,
    pub interviewers: Vec<Interviewer>,
    pub questions_to_ask: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInterviewSettings {
    pub client_name: Option<String>,
    pub client_contact: Option<String>,
    #[serde(alias = "mode")]
    pub interview_format: Option<InterviewFormat>,
    pub interviewers: Vec<Interviewer>,
    pub questions_to_ask: Vec<String>,
    pub feedback_required: bool,
}

impl Default for ClientInterviewSettings {
    fn default() -> Self {
        Self {
            client_name: None,
            client_contact: None,
            interview_format: None,
            interviewers: Vec::new(),
            questions_to_ask: Vec::new(),
            feedback_required: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorPartnerInterviewSettings {
    pub vendor_name: Option<String>,
    pub partner_contact: Option<String>,
    #[serde(alias = "mode")]
    pub interview_format: Option<InterviewFormat>,
    pub interviewers: Vec<Interviewer>,
    pub commercials_discussed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AptitudeTestSettings {
    pub test_platform: Option<String>,
    pub test_link: Option<String>,
    #[serde(deserialize_with = "test_minutes")]
    pub duration: u32,
    #[serde(deserialize_with = "passing_score")]
    pub passing_score: u32,
    pub result_source: ResultSource,
    pub status: TestStatus,
    pub score: Option<u32>,
    /// Evaluators reviewing manual results.
    pub interviewers: Vec<Interviewer>,
}

impl Default for AptitudeTestSettings {
    fn default() -> Self {
        Self {
            test_platform: None,
            test_link: None,
            duration: DEFAULT_TEST_MINUTES,
            passing_score: DEFAULT_PASSING_SCORE,
            result_source: ResultSource::Auto,
            status: TestStatus::Pending,
            score: None,
            interviewers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomStageSettings {
    pub description: Option<String>,
    #[serde(alias = "mode")]
    pub interview_format: Option<InterviewFormat>,
    pub interviewers: Vec<Interviewer>,
}

/// Parse a numeric form value, falling back when it is empty, negative, or not a number.
pub fn coerce_number(raw: &str, fallback: u32) -> u32 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(non_negative)
        .unwrap_or(fallback)
}

fn non_negative(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX)).then_some(value as u32)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    fn resolve(self, fallback: u32) -> u32 {
        match self {
            NumericInput::Number(value) => non_negative(value).unwrap_or(fallback),
            NumericInput::Text(raw) => coerce_number(&raw, fallback),
        }
    }

    fn minutes(self) -> Option<u32> {
        match self {
            NumericInput::Number(value) => non_negative(value),
            NumericInput::Text(raw) => raw.trim().parse::<f64>().ok().and_then(non_negative),
        }
    }
}

fn lenient_number<'de, D>(deserializer: D, fallback: u32) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<NumericInput>::deserialize(deserializer)?;
    Ok(input.map_or(fallback, |value| value.resolve(fallback)))
}

fn call_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_number(deserializer, DEFAULT_CALL_MINUTES)
}

fn test_minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_number(deserializer, DEFAULT_TEST_MINUTES)
}

fn passing_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_number(deserializer, DEFAULT_PASSING_SCORE)
}

/// Optional minutes: unparsable or negative input clears the value instead of failing the
/// save, whether it arrives as a number or as text.
pub(crate) fn optional_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<NumericInput>::deserialize(deserializer)?;
    Ok(input.and_then(NumericInput::minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_number_falls_back_on_garbage() {
        assert_eq!(coerce_number("45", 30), 45);
        assert_eq!(coerce_number(" 90.0 ", 30), 90);
        assert_eq!(coerce_number("NaN", 30), 30);
        assert_eq!(coerce_number("forty", 30), 30);
        assert_eq!(coerce_number("-5", 30), 30);
        assert_eq!(coerce_number("", 30), 30);
    }

    #[test]
    fn aptitude_numeric_fields_accept_strings_and_fall_back() {
        let settings: AptitudeTestSettings = serde_json::from_value(json!({
            "test_platform": "HackerRank",
            "duration": "45",
            "passing_score": "abc",
        }))
        .expect("settings parse");

        assert_eq!(settings.duration, 45);
        assert_eq!(settings.passing_score, DEFAULT_PASSING_SCORE);
        assert_eq!(settings.result_source, ResultSource::Auto);
        assert_eq!(settings.status, TestStatus::Pending);
    }

    #[test]
    fn background_checklist_seeds_all_outstanding() {
        let settings = BackgroundVerificationSettings::default();
        assert_eq!(settings.documents_uploaded.outstanding().len(), 5);
        assert_eq!(settings.verification_status, VerificationStatus::Pending);
    }

    #[test]
    fn scheduling_duration_treats_numbers_and_text_alike() {
        use crate::workflows::pipeline::domain::SchedulingInfo;

        let parse = |duration: serde_json::Value| -> Option<u32> {
            serde_json::from_value::<SchedulingInfo>(json!({ "duration": duration }))
                .expect("scheduling parses")
                .duration
        };

        assert_eq!(parse(json!(45)), Some(45));
        assert_eq!(parse(json!("45")), Some(45));
        assert_eq!(parse(json!(-15)), None);
        assert_eq!(parse(json!("-15")), None);
        assert_eq!(parse(json!("soon")), None);
        assert_eq!(parse(json!(null)), None);
    }

    #[test]
    fn negative_numbers_fall_back_like_negative_text() {
        let settings: AptitudeTestSettings = serde_json::from_value(json!({
            "duration": -20,
            "passing_score": "-5",
        }))
        .expect("settings parse");
        assert_eq!(settings.duration, DEFAULT_TEST_MINUTES);
        assert_eq!(settings.passing_score, DEFAULT_PASSING_SCORE);
    }

    #[test]
    fn interview_format_labels_match_form_options() {
        let labels: Vec<&str> = [
            InterviewFormat::InPerson,
            InterviewFormat::Video,
            InterviewFormat::Phone,
        ]
        .into_iter()
        .map(InterviewFormat::label)
        .collect();
        assert_eq!(labels, vec!["In Person", "Video", "Phone"]);
    }

    #[test]
    fn mode_is_accepted_as_interview_format() {
        let settings: InterviewSettings = serde_json::from_value(json!({
            "interview_type": "managerial",
            "mode": "video",
        }))
        .expect("settings parse");
        assert_eq!(settings.interview_format, Some(InterviewFormat::Video));
        assert_eq!(settings.interview_type, InterviewType::Managerial);
    }
}
