use crate::cli::ServeArgs;
use crate::infra::{open_repository, AppState};
use crate::routes::with_registration_routes;
use arion_recruit::applications::RegistrationService;
use arion_recruit::config::{AppConfig, StorageConfig};
use arion_recruit::error::AppError;
use arion_recruit::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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
    if let Some(database) = args.database.take() {
        config.storage = StorageConfig::from_raw(&database.to_string_lossy());
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(open_repository(&config.storage)?);
    let registration_service = Arc::new(RegistrationService::new(
        repository,
        config.registration.clone(),
    ));

    let app = with_registration_routes(registration_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        prefix = %config.registration.prefix,
        "recruitment intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
