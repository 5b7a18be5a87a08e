use crate::api::{ApiError, DateRangeError};
use crate::config::ConfigError;
use crate::entries::EntryServiceError;
use crate::reports::ExportError;
use crate::session::SessionError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Api(ApiError),
    Session(SessionError),
    Entry(EntryServiceError),
    Export(ExportError),
    DateRange(DateRangeError),
    InvalidInput(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Api(err) | AppError::Entry(EntryServiceError::Api(err)) => api_status(err),
            AppError::Session(_) => StatusCode::UNAUTHORIZED,
            AppError::Entry(EntryServiceError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Export(ExportError::NoFields)
            | AppError::DateRange(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Export(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn api_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Session(_) | ApiError::SessionExpired { .. } => StatusCode::UNAUTHORIZED,
        ApiError::Http { status, .. } if (400..500).contains(status) => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ApiError::InvalidUrl(_) | ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ApiError::Http { .. } | ApiError::Transport(_) | ApiError::Decode { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Api(err) => write!(f, "{}", err),
            AppError::Session(err) => write!(f, "{}", err),
            AppError::Entry(err) => write!(f, "{}", err),
            AppError::Export(err) => write!(f, "export failed: {}", err),
            AppError::DateRange(err) => write!(f, "invalid date range: {}", err),
            AppError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Api(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::Entry(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::DateRange(err) => Some(err),
            AppError::InvalidInput(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ApiError> for AppError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}

impl From<EntryServiceError> for AppError {
    fn from(value: EntryServiceError) -> Self {
        Self::Entry(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<DateRangeError> for AppError {
    fn from(value: DateRangeError) -> Self {
        Self::DateRange(value)
    }
}
