use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bankability::config::AppConfig;
use bankability::diagnostic::{notifier, DiagnosticService, ScoringEngine, SubmissionPolicy};
use bankability::error::AppError;
use bankability::telemetry;
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

    let diagnostic = &config.diagnostic;
    let notifier = notifier::from_config(
        diagnostic.webhook_url.as_deref(),
        diagnostic.webhook_timeout,
    )?;
    let service = Arc::new(DiagnosticService::new(
        ScoringEngine::default(),
        notifier,
        SubmissionPolicy::from_config(diagnostic),
    ));

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        webhook = diagnostic.webhook_url.is_some(),
        "bankability diagnostic service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
