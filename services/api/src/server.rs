use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryPipelineRepository};
use crate::routes::with_pipeline_routes;
use ams_pipeline::config::AppConfig;
use ams_pipeline::error::AppError;
use ams_pipeline::telemetry;
use ams_pipeline::workflows::pipeline::PipelineService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog(config.catalog.csv_path.as_deref())?;
    info!(
        templates = catalog.list_templates().len(),
        source = ?config.catalog.csv_path,
        "stage catalog loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryPipelineRepository::default());
    let pipeline_service = Arc::new(PipelineService::new(repository, catalog));

    let app = with_pipeline_routes(pipeline_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "pipeline service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
