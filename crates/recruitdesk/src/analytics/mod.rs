//! Dashboard arithmetic: counters, conversion and growth percentages, the EBES
//! composite score and client health tags.

mod health;
mod rates;
mod score;
mod snapshot;
mod summary;

pub use health::{client_health, ClientHealthEntry, HealthTag, STRONG_ACCOUNT_CONVERSION};
pub use rates::{conversion_rate, format_rate, growth_percentage, sum_field, Growth};
pub use score::{
    composite_score, CompositeScore, EbesWeights, PerformanceLabel, ScoreBands,
    ScoreBandsError, ScoreCategory, ScoreComponent,
};
pub use snapshot::{ClientMetrics, MetricField, MetricSnapshot, TeamMetrics};
pub use summary::{
    derived_metrics, period_growth, rank_clients, rank_teams, DashboardSummary, DerivedMetric,
    DerivedMetricKind, GrowthEntry,
};
