use crate::cli::ServeArgs;
use crate::infra::{bootstrap, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruitdesk::analytics::EbesWeights;
use recruitdesk::error::AppError;
use recruitdesk::reports::ReportingState;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs, base_url: Option<&str>) -> Result<(), AppError> {
    let mut config = bootstrap(base_url)?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let reporting = Arc::new(ReportingState {
        weights: EbesWeights::default(),
        bands: config.scoring.bands,
    });

    let app = with_service_routes(reporting)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        bands_configured = config.scoring.bands.is_some(),
        "report service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
