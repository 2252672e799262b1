use ams_pipeline::workflows::pipeline::{
    CatalogImportError, PipelineId, PipelineRecord, PipelineRepository, RepositoryError,
    StageCatalog,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Pipelines live for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPipelineRepository {
    records: Arc<Mutex<HashMap<PipelineId, PipelineRecord>>>,
}

impl PipelineRepository for InMemoryPipelineRepository {
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
        match guard.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
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

pub(crate) fn load_catalog(csv_path: Option<&Path>) -> Result<StageCatalog, CatalogImportError> {
    match csv_path {
        Some(path) => StageCatalog::from_path(path),
        None => Ok(StageCatalog::standard()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
