use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::board::PipelineBoard;

/// Identifier wrapper for stored pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineId(pub String);

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted pipeline: the board snapshot plus bookkeeping metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRecord {
    pub id: PipelineId,
    pub name: String,
    pub board: PipelineBoard,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait PipelineRepository: Send + Sync {
    fn insert(&self, record: PipelineRecord) -> Result<PipelineRecord, RepositoryError>;
    fn update(&self, record: PipelineRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PipelineId) -> Result<Option<PipelineRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<PipelineRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
