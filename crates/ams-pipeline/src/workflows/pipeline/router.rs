use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::{PipelineError, StageId};
use super::repository::{PipelineId, PipelineRepository, RepositoryError};
use super::service::{PipelineService, PipelineServiceError};
use super::stage_config::StageConfig;

type SharedService<R> = Arc<PipelineService<R>>;

#[derive(Debug, Deserialize)]
pub struct CreatePipelineRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddStageRequest {
    pub template_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub drag_index: usize,
    pub hover_index: usize,
}

/// Router builder exposing the pipeline editor endpoints.
pub fn pipeline_router<R>(service: SharedService<R>) -> Router
where
    R: PipelineRepository + 'static,
{
    Router::new()
        .route("/api/v1/pipeline/catalog", get(catalog_handler::<R>))
        .route(
            "/api/v1/pipelines",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/pipelines/:pipeline_id", get(fetch_handler::<R>))
        .route(
            "/api/v1/pipelines/:pipeline_id/stages",
            post(add_stage_handler::<R>),
        )
        .route(
            "/api/v1/pipelines/:pipeline_id/stages/:stage_id",
            delete(remove_stage_handler::<R>),
        )
        .route(
            "/api/v1/pipelines/:pipeline_id/reorder",
            post(reorder_handler::<R>),
        )
        .route(
            "/api/v1/pipelines/:pipeline_id/stages/:stage_id/config",
            get(config_form_handler::<R>).put(save_config_handler::<R>),
        )
        .route(
            "/api/v1/pipelines/:pipeline_id/flow",
            get(flow_handler::<R>),
        )
        .route(
            "/api/v1/pipelines/:pipeline_id/report",
            get(report_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn catalog_handler<R>(State(service): State<SharedService<R>>) -> Response
where
    R: PipelineRepository + 'static,
{
    let templates = service.catalog().list_templates();
    (StatusCode::OK, axum::Json(templates)).into_response()
}

pub(crate) async fn create_handler<R>(
    State(service): State<SharedService<R>>,
    axum::Json(request): axum::Json<CreatePipelineRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.create(&request.name) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<SharedService<R>>) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.list() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<SharedService<R>>,
    Path(pipeline_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.get(&PipelineId(pipeline_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_stage_handler<R>(
    State(service): State<SharedService<R>>,
    Path(pipeline_id): Path<String>,
    axum::Json(request): axum::Json<AddStageRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.add_stage(&PipelineId(pipeline_id), &request.template_id) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_stage_handler<R>(
    State(service): State<SharedService<R>>,
    Path((pipeline_id, stage_id)): Path<(String, String)>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.remove_stage(&PipelineId(pipeline_id), &StageId(stage_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reorder_handler<R>(
    State(service): State<SharedService<R>>,
    Path(pipeline_id): Path<String>,
    axum::Json(request): axum::Json<ReorderRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.reorder(
        &PipelineId(pipeline_id),
        request.drag_index,
        request.hover_index,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn config_form_handler<R>(
    State(service): State<SharedService<R>>,
    Path((pipeline_id, stage_id)): Path<(String, String)>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.config_form(&PipelineId(pipeline_id), &StageId(stage_id)) {
        Ok(config) => (StatusCode::OK, axum::Json(config)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_config_handler<R>(
    State(service): State<SharedService<R>>,
    Path((pipeline_id, stage_id)): Path<(String, String)>,
    axum::Json(config): axum::Json<StageConfig>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.save_config(&PipelineId(pipeline_id), &StageId(stage_id), config) {
        Ok(stage) => (StatusCode::OK, axum::Json(stage)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn flow_handler<R>(
    State(service): State<SharedService<R>>,
    Path(pipeline_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.flow(&PipelineId(pipeline_id)) {
        Ok(flow) => (StatusCode::OK, axum::Json(flow)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn report_handler<R>(
    State(service): State<SharedService<R>>,
    Path(pipeline_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.report(&PipelineId(pipeline_id), today) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: PipelineServiceError) -> Response {
    let status = match &error {
        PipelineServiceError::NotFound(_)
        | PipelineServiceError::Pipeline(PipelineError::StageNotFound(_)) => StatusCode::NOT_FOUND,
        PipelineServiceError::UnknownTemplate(_)
        | PipelineServiceError::InvalidName
        | PipelineServiceError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PipelineServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PipelineServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
