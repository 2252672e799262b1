use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::pipeline::catalog::StageCatalog;
use crate::workflows::pipeline::domain::{Interviewer, Stage, StageId, StageTemplate};
use crate::workflows::pipeline::repository::{
    PipelineId, PipelineRecord, PipelineRepository, RepositoryError,
};
use crate::workflows::pipeline::{add_stage, PipelineService};

pub(super) fn template(id: &str) -> StageTemplate {
    StageCatalog::standard()
        .find(id)
        .cloned()
        .expect("template present in standard catalog")
}

/// Build a pipeline from template ids, numbering stage ids `s1`, `s2`, ...
pub(super) fn stages_from(template_ids: &[&str]) -> Vec<Stage> {
    template_ids
        .iter()
        .enumerate()
        .fold(Vec::new(), |stages, (index, template_id)| {
            add_stage(
                &stages,
                &template(template_id),
                StageId(format!("s{}", index + 1)),
            )
        })
}

pub(super) fn orders(stages: &[Stage]) -> Vec<u32> {
    stages.iter().map(|stage| stage.order).collect()
}

pub(super) fn names(stages: &[Stage]) -> Vec<&str> {
    stages.iter().map(|stage| stage.name.as_str()).collect()
}

pub(super) fn assert_dense(stages: &[Stage]) {
    let expected: Vec<u32> = (1..=stages.len() as u32).collect();
    assert_eq!(orders(stages), expected, "order must be dense 1..N");
}

pub(super) fn interviewer(id: &str, name: &str) -> Interviewer {
    Interviewer {
        id: id.to_string(),
        name: name.to_string(),
        email: Some(format!("{id}@ams.example")),
        avatar: None,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<PipelineId, PipelineRecord>>>,
}

impl PipelineRepository for MemoryRepository {
    fn insert(&self, record: PipelineRecord) -> Result<PipelineRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: PipelineRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &PipelineId) -> Result<Option<PipelineRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<PipelineRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// In-memory repository whose reads stall, widening the window between fetch and update.
#[derive(Default, Clone)]
pub(super) struct SlowReadRepository {
    pub(super) inner: MemoryRepository,
}

impl PipelineRepository for SlowReadRepository {
    fn insert(&self, record: PipelineRecord) -> Result<PipelineRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: PipelineRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: &PipelineId) -> Result<Option<PipelineRecord>, RepositoryError> {
        let record = self.inner.fetch(id);
        std::thread::sleep(std::time::Duration::from_millis(5));
        record
    }

    fn list(&self) -> Result<Vec<PipelineRecord>, RepositoryError> {
        self.inner.list()
    }
}

pub(super) struct ConflictRepository;

impl PipelineRepository for ConflictRepository {
    fn insert(&self, _record: PipelineRecord) -> Result<PipelineRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: PipelineRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &PipelineId) -> Result<Option<PipelineRecord>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<PipelineRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl PipelineRepository for UnavailableRepository {
    fn insert(&self, _record: PipelineRecord) -> Result<PipelineRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn update(&self, _record: PipelineRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn fetch(&self, _id: &PipelineId) -> Result<Option<PipelineRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn list(&self) -> Result<Vec<PipelineRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }
}

pub(super) fn build_service() -> (PipelineService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PipelineService::new(repository.clone(), StageCatalog::standard());
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("body is json")
}
