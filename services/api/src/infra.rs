use arion_recruit::applications::{RepositoryError, SqliteRegistrationRepository};
use arion_recruit::config::StorageConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_repository(
    storage: &StorageConfig,
) -> Result<SqliteRegistrationRepository, RepositoryError> {
    match storage {
        StorageConfig::InMemory => {
            info!("registrations kept in memory; they are lost on shutdown");
            SqliteRegistrationRepository::open_in_memory()
        }
        StorageConfig::Sqlite(path) => {
            info!(path = %path.display(), "opening registration database");
            SqliteRegistrationRepository::open(path)
        }
    }
}
