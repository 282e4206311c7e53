use crate::cli::ServeArgs;
use crate::infra::{AdvisorBackend, AppState, HistoryBackend};
use crate::routes::with_decision_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use decision_ai::config::AppConfig;
use decision_ai::error::AppError;
use decision_ai::telemetry;
use decision_ai::workflows::decisions::{DecisionServiceError, DecisionService};
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

    let history = HistoryBackend::from_path(config.decisions.history_path.as_deref())
        .map_err(DecisionServiceError::from)?;
    let history_label = history.describe();
    let advisor = AdvisorBackend::from_config(&config.advice)?;
    let advisor_label = advisor.describe();
    let policy = config.decisions.non_finite_policy;
    let decision_service = Arc::new(DecisionService::new(
        Arc::new(history),
        Arc::new(advisor),
        policy,
    ));

    let app = with_decision_routes(decision_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        history = %history_label,
        advisor = %advisor_label,
        policy = policy.label(),
        "decision service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
