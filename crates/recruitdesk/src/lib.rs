//! Client core for the recruitment-agency CRM: dashboard analytics, report
//! export, a typed REST client with session headers and a short-lived
//! response cache, and recruiter entry validation.

pub mod analytics;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod entries;
pub mod error;
pub mod reports;
pub mod session;
pub mod telemetry;

pub use analytics::{MetricField, MetricSnapshot};
pub use api::{CrmClient, DashboardRole};
pub use session::{SessionStore, SessionUser};
