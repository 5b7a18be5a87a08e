use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cache::ResponseCache;
use super::endpoints::{
    AnalyticsResponse, DashboardRole, DateRange, EbesScoreResponse, PerformanceFilters,
    PerformanceResponse,
};
use super::transport::{HttpMethod, HttpRequest, Transport, TransportError};
use crate::session::{SessionError, SessionStore, SessionUser, USER_ID_HEADER};

/// Failure talking to the CRM backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("your session has expired (HTTP {status}); please log out and log back in")]
    SessionExpired { status: u16 },
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid request url '{0}'")]
    InvalidUrl(String),
    #[error("unable to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::SessionExpired { status } | ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

fn error_for_status(status: u16, body: &str) -> ApiError {
    if status == 401 || status == 403 {
        return ApiError::SessionExpired { status };
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|payload| payload.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"));
    ApiError::Http { status, message }
}

/// Typed client for the CRM REST API.
///
/// Every call resolves the session user first, so a missing or malformed
/// session fails before anything touches the network.
pub struct CrmClient<T, S> {
    base_url: String,
    transport: T,
    session: Arc<S>,
    cache: ResponseCache,
}

impl<T, S> CrmClient<T, S>
where
    T: Transport,
    S: SessionStore,
{
    pub fn new(base_url: impl Into<String>, transport: T, session: Arc<S>, cache: ResponseCache) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
            cache,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn current_user(&self) -> Result<SessionUser, ApiError> {
        Ok(self.session.current_user()?)
    }

    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = reqwest::Url::parse(&raw).map_err(|_| ApiError::InvalidUrl(raw.clone()))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        Ok(url.to_string())
    }

    /// Raw GET body, served from the cache while fresh.
    pub async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let user = self.session.current_user()?;
        let url = self.url(path, query)?;

        if let Some(body) = self.cache.get(&url) {
            debug!(%url, "response cache hit");
            return Ok(body);
        }
        debug!(%url, "response cache miss");

        let response = self
            .transport
            .execute(HttpRequest {
                method: HttpMethod::Get,
                url: url.clone(),
                headers: vec![(USER_ID_HEADER.to_string(), user.id)],
                body: None,
            })
            .await?;

        if !response.is_success() {
            warn!(%url, status = response.status, "CRM request failed");
            return Err(error_for_status(response.status, &response.body));
        }

        self.cache.put(&url, &response.body);
        Ok(response.body)
    }

    pub async fn get_json<R>(&self, path: &str, query: &[(&str, String)]) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let body = self.get_text(path, query).await?;
        decode(&self.url(path, query)?, &body)
    }

    /// Sends a write. The whole GET cache is dropped before the request leaves.
    pub async fn send_json<B, R>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &B,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let user = self.session.current_user()?;
        let url = self.url(path, &[])?;
        let body = serde_json::to_string(payload).map_err(ApiError::Encode)?;

        self.cache.clear();
        info!(%url, %method, "sending CRM write");

        let response = self
            .transport
            .execute(HttpRequest {
                method,
                url: url.clone(),
                headers: vec![(USER_ID_HEADER.to_string(), user.id)],
                body: Some(body),
            })
            .await?;

        if !response.is_success() {
            warn!(%url, status = response.status, "CRM write rejected");
            return Err(error_for_status(response.status, &response.body));
        }

        if response.body.trim().is_empty() {
            decode(&url, "null")
        } else {
            decode(&url, &response.body)
        }
    }

    /// Account-manager score; the label comes from the backend's own bands.
    pub async fn ebes_score(
        &self,
        range: Option<&DateRange>,
    ) -> Result<EbesScoreResponse, ApiError> {
        let query = range.map(DateRange::query).unwrap_or_default();
        self.get_json("/api/am/ebes-score", &query).await
    }

    pub async fn analytics(
        &self,
        role: DashboardRole,
        range: &DateRange,
    ) -> Result<AnalyticsResponse, ApiError> {
        let path = format!("/api/{}/analytics", role.prefix());
        self.get_json(&path, &range.query()).await
    }

    pub async fn performance(
        &self,
        role: DashboardRole,
        filters: &PerformanceFilters,
    ) -> Result<PerformanceResponse, ApiError> {
        let path = format!("/api/{}/performance", role.prefix());
        self.get_json(&path, &filters.query()).await
    }
}

fn decode<R: DeserializeOwned>(url: &str, body: &str) -> Result<R, ApiError> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}
