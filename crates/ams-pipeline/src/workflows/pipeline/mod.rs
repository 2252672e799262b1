//! Hiring pipeline stage model: catalog, ordered stage list, per-type configuration, and
//! the derived flow and report views.

pub mod board;
pub mod catalog;
pub mod collection;
pub mod domain;
pub mod drag;
pub mod flow;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod stage_config;

#[cfg(test)]
mod tests;

pub use board::PipelineBoard;
pub use catalog::{CatalogImportError, StageCatalog};
pub use collection::{add_stage, remove_stage, reorder_stage, validate_stages, StageIdSequence};
pub use domain::{
    Category, Interviewer, PipelineError, SchedulingInfo, Stage, StageId, StageStatus,
    StageTemplate, TaAssignment,
};
pub use drag::{CardBounds, DragSession, ReorderMove};
pub use flow::{FlowNode, PipelineFlow, StageCard};
pub use report::PipelineReport;
pub use repository::{PipelineId, PipelineRecord, PipelineRepository, RepositoryError};
pub use router::pipeline_router;
pub use service::{PipelineService, PipelineServiceError};
pub use stage_config::{
    infer_stage_type, open_config_form, save_config, StageConfig, StageSettings, StageType,
};
