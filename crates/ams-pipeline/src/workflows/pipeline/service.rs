use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use super::board::PipelineBoard;
use super::catalog::StageCatalog;
use super::domain::{PipelineError, Stage, StageId, StageTemplate};
use super::flow::PipelineFlow;
use super::report::PipelineReport;
use super::repository::{PipelineId, PipelineRecord, PipelineRepository, RepositoryError};
use super::stage_config::StageConfig;

/// Service composing the stage catalog with pipeline storage.
///
/// Each read-modify-write of a pipeline runs under that pipeline's lock.
pub struct PipelineService<R> {
    catalog: Arc<StageCatalog>,
    repository: Arc<R>,
    locks: Mutex<HashMap<PipelineId, Arc<Mutex<()>>>>,
}

static PIPELINE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_pipeline_id() -> PipelineId {
    let id = PIPELINE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PipelineId(format!("pipeline-{id:06}"))
}

impl<R> PipelineService<R>
where
    R: PipelineRepository + 'static,
{
    pub fn new(repository: Arc<R>, catalog: StageCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            repository,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    /// Create an empty pipeline.
    pub fn create(&self, name: &str) -> Result<PipelineRecord, PipelineServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PipelineServiceError::InvalidName);
        }

        let now = Utc::now();
        let record = PipelineRecord {
            id: next_pipeline_id(),
            name: name.to_string(),
            board: PipelineBoard::new(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        info!(pipeline = %stored.id, name = %stored.name, "pipeline created");
        Ok(stored)
    }

    pub fn get(&self, pipeline_id: &PipelineId) -> Result<PipelineRecord, PipelineServiceError> {
        self.repository
            .fetch(pipeline_id)?
            .ok_or_else(|| PipelineServiceError::NotFound(pipeline_id.clone()))
    }

    pub fn list(&self) -> Result<Vec<PipelineRecord>, PipelineServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    pub fn add_stage(
        &self,
        pipeline_id: &PipelineId,
        template_id: &str,
    ) -> Result<PipelineRecord, PipelineServiceError> {
        let template = self.template(template_id)?.clone();
        self.mutate(pipeline_id, |board| {
            let stage = board.on_add_stage(&template);
            info!(
                pipeline = %pipeline_id,
                stage = %stage.id,
                order = stage.order,
                "stage added"
            );
            Ok(())
        })
    }

    /// Remove a stage. Unknown stage ids leave the pipeline untouched.
    pub fn remove_stage(
        &self,
        pipeline_id: &PipelineId,
        stage_id: &StageId,
    ) -> Result<PipelineRecord, PipelineServiceError> {
        self.mutate(pipeline_id, |board| {
            if board.on_remove_stage(stage_id) {
                info!(pipeline = %pipeline_id, stage = %stage_id, "stage removed");
            } else {
                debug!(
                    pipeline = %pipeline_id,
                    stage = %stage_id,
                    "remove ignored for unknown stage"
                );
            }
            Ok(())
        })
    }

    pub fn reorder(
        &self,
        pipeline_id: &PipelineId,
        drag_index: usize,
        hover_index: usize,
    ) -> Result<PipelineRecord, PipelineServiceError> {
        self.mutate(pipeline_id, |board| {
            if drag_index >= board.len() || hover_index >= board.len() {
                warn!(
                    pipeline = %pipeline_id,
                    drag_index,
                    hover_index,
                    stages = board.len(),
                    "reorder indices out of range"
                );
            }
            board.on_reorder_stages(drag_index, hover_index);
            debug!(pipeline = %pipeline_id, drag_index, hover_index, "stages reordered");
            Ok(())
        })
    }

    /// Open the configuration form for a stage.
    pub fn config_form(
        &self,
        pipeline_id: &PipelineId,
        stage_id: &StageId,
    ) -> Result<StageConfig, PipelineServiceError> {
        let record = self.get(pipeline_id)?;
        record
            .board
            .on_configure_stage(stage_id)
            .ok_or_else(|| PipelineError::StageNotFound(stage_id.clone()).into())
    }

    pub fn save_config(
        &self,
        pipeline_id: &PipelineId,
        stage_id: &StageId,
        config: StageConfig,
    ) -> Result<Stage, PipelineServiceError> {
        let mut saved = None;
        self.mutate(pipeline_id, |board| {
            let stage = board.on_save_stage_config(stage_id, config)?;
            info!(
                pipeline = %pipeline_id,
                stage = %stage.id,
                status = stage.status.label(),
                missing = stage.missing_items.len(),
                "stage configuration saved"
            );
            saved = Some(stage.clone());
            Ok(())
        })?;
        saved.ok_or_else(|| PipelineError::StageNotFound(stage_id.clone()).into())
    }

    pub fn flow(&self, pipeline_id: &PipelineId) -> Result<PipelineFlow, PipelineServiceError> {
        Ok(self.get(pipeline_id)?.board.flow())
    }

    pub fn report(
        &self,
        pipeline_id: &PipelineId,
        today: NaiveDate,
    ) -> Result<PipelineReport, PipelineServiceError> {
        Ok(self.get(pipeline_id)?.board.report(today))
    }

    fn template(&self, template_id: &str) -> Result<&StageTemplate, PipelineServiceError> {
        self.catalog
            .find(template_id)
            .ok_or_else(|| PipelineServiceError::UnknownTemplate(template_id.to_string()))
    }

    fn mutate<F>(
        &self,
        pipeline_id: &PipelineId,
        apply: F,
    ) -> Result<PipelineRecord, PipelineServiceError>
    where
        F: FnOnce(&mut PipelineBoard) -> Result<(), PipelineError>,
    {
        let lock = self.pipeline_lock(pipeline_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.get(pipeline_id)?;
        apply(&mut record.board)?;
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;
        Ok(record)
    }

    fn pipeline_lock(&self, pipeline_id: &PipelineId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(pipeline_id.clone()).or_default().clone()
    }
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error("pipeline {0} not found")]
    NotFound(PipelineId),
    #[error("stage template '{0}' is not in the catalog")]
    UnknownTemplate(String),
    #[error("pipeline name must not be empty")]
    InvalidName,
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
