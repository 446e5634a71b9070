use crate::cli::ServeArgs;
use crate::infra::{build_engine, load_catalog, load_repository, AppState};
use crate::routes::with_screener_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use benefit_screener::config::AppConfig;
use benefit_screener::eligibility::ScreenerEvaluationService;
use benefit_screener::error::AppError;
use benefit_screener::telemetry;
use std::sync::atomic::Ordering;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(load_repository(&config)?);
    let engine = build_engine(&config)?;
    let catalog = load_catalog(&config)?;
    let screener_service = Arc::new(ScreenerEvaluationService::new(repository, engine, catalog));

    let app = with_screener_routes(screener_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        library_api = config.library_api.base_url.as_str(),
        decision_engine = config.decision_engine.base_url.as_str(),
        "benefit screener ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
