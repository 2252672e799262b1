use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::domain::{Category, StageTemplate};
use super::stage_config::{infer_stage_type, StageType};

/// Read-only list of stage templates a pipeline can be built from.
#[derive(Debug, Clone)]
pub struct StageCatalog {
    templates: Vec<StageTemplate>,
}

impl StageCatalog {
    pub fn standard() -> Self {
        Self {
            templates: standard_stage_templates(),
        }
    }

    pub fn list_templates(&self) -> &[StageTemplate] {
        &self.templates
    }

    pub fn find(&self, template_id: &str) -> Option<&StageTemplate> {
        self.templates
            .iter()
            .find(|template| template.id == template_id)
    }

    pub fn templates_in(&self, category: Category) -> Vec<&StageTemplate> {
        self.templates
            .iter()
            .filter(|template| template.category == category)
            .collect()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Load a catalog export with `id,name,category[,stage_type]` columns.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut seen = HashSet::new();
        let mut templates = Vec::new();

        for (index, row) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = row?;
            let line = index + 2;

            if row.id.is_empty() || row.name.is_empty() {
                return Err(CatalogImportError::MissingField { line });
            }
            let category = Category::parse(&row.category).ok_or_else(|| {
                CatalogImportError::UnknownCategory {
                    line,
                    value: row.category.clone(),
                }
            })?;
            if !seen.insert(row.id.clone()) {
                return Err(CatalogImportError::DuplicateTemplate(row.id));
            }

            let stage_type = row
                .stage_type
                .as_deref()
                .map(StageType::from_tag)
                .unwrap_or_else(|| infer_stage_type(&row.name));

            templates.push(StageTemplate {
                id: row.id,
                name: row.name,
                category,
                stage_type,
            });
        }

        if templates.is_empty() {
            return Err(CatalogImportError::Empty);
        }

        Ok(Self { templates })
    }
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    stage_type: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingField { line: usize },
    UnknownCategory { line: usize, value: String },
    DuplicateTemplate(String),
    Empty,
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read stage catalog: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid stage catalog CSV: {}", err),
            CatalogImportError::MissingField { line } => {
                write!(f, "catalog line {} is missing an id or name", line)
            }
            CatalogImportError::UnknownCategory { line, value } => {
                write!(f, "catalog line {} has unknown category '{}'", line, value)
            }
            CatalogImportError::DuplicateTemplate(id) => {
                write!(f, "catalog template '{}' is listed more than once", id)
            }
            CatalogImportError::Empty => write!(f, "stage catalog contains no templates"),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

fn template(id: &str, name: &str, category: Category, stage_type: StageType) -> StageTemplate {
    StageTemplate {
        id: id.to_string(),
        name: name.to_string(),
        category,
        stage_type,
    }
}

fn standard_stage_templates() -> Vec<StageTemplate> {
    vec![
        template(
            "phone-screening",
            "Phone Screening",
            Category::Internal,
            StageType::PhoneScreening,
        ),
        template(
            "hygiene-screening",
            "Hygiene Screening",
            Category::Internal,
            StageType::HygieneScreening,
        ),
        template(
            "technical-interview",
            "Technical Interview",
            Category::Internal,
            StageType::Interview,
        ),
        template(
            "hr-interview",
            "HR Interview",
            Category::Internal,
            StageType::Interview,
        ),
        template(
            "managerial-round",
            "Managerial Round",
            Category::Internal,
            StageType::Interview,
        ),
        template(
            "aptitude-test",
            "Aptitude Test",
            Category::External,
            StageType::AptitudeTest,
        ),
        template(
            "vendor-partner-interview",
            "Vendor Partner Interview",
            Category::Partner,
            StageType::VendorPartnerInterview,
        ),
        template(
            "client-interview",
            "Client Interview",
            Category::Client,
            StageType::ClientInterview,
        ),
        template(
            "client-final-round",
            "Client Final Round",
            Category::Client,
            StageType::ClientInterview,
        ),
        template(
            "background-verification",
            "Background Verification",
            Category::Verification,
            StageType::BackgroundVerification,
        ),
        template(
            "offer-discussion",
            "Offer Discussion",
            Category::Internal,
            StageType::Custom,
        ),
    ]
}
