//! REST access to the CRM backend.

pub mod cache;
mod client;
mod endpoints;
pub mod transport;

pub use cache::{Clock, ManualClock, ResponseCache, SystemClock, DEFAULT_CACHE_TTL};
pub use client::{ApiError, CrmClient};
pub use endpoints::{
    AnalyticsResponse, DashboardRole, DateRange, DateRangeError, EbesScoreResponse,
    PerformanceFilters, PerformanceResponse,
};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};
