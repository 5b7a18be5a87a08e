use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use recruitdesk::api::{ApiError, CrmClient, ReqwestTransport, ResponseCache};
use recruitdesk::config::{normalize_base_url, AppConfig};
use recruitdesk::error::AppError;
use recruitdesk::session::FileSessionStore;
use recruitdesk::telemetry;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type LiveClient = CrmClient<ReqwestTransport, FileSessionStore>;

/// Loads configuration, applies a CLI base URL override and installs tracing.
pub(crate) fn bootstrap(base_url: Option<&str>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(raw) = base_url {
        config.crm.base_url = normalize_base_url(raw)?;
    }
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn session_store(config: &AppConfig) -> FileSessionStore {
    FileSessionStore::new(config.crm.session_file.clone())
}

pub(crate) fn connect(config: &AppConfig) -> Result<Arc<LiveClient>, AppError> {
    let transport = ReqwestTransport::new(config.crm.request_timeout).map_err(ApiError::from)?;
    Ok(Arc::new(CrmClient::new(
        config.crm.base_url.clone(),
        transport,
        Arc::new(session_store(config)),
        ResponseCache::new(config.crm.cache_ttl),
    )))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
