use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::{ClientMetrics, MetricSnapshot, PerformanceLabel, TeamMetrics};

/// Dashboard audiences; each reads from its own API prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardRole {
    Admin,
    #[serde(alias = "am")]
    AccountManager,
    Recruiter,
    #[serde(alias = "rm")]
    RecruitmentManager,
}

impl DashboardRole {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Admin,
            Self::AccountManager,
            Self::Recruiter,
            Self::RecruitmentManager,
        ]
    }

    /// Path segment under `/api/`, also used to name exported reports.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::AccountManager => "am",
            Self::Recruiter => "recruiter",
            Self::RecruitmentManager => "rm",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::AccountManager => "Account Manager",
            Self::Recruiter => "Recruiter",
            Self::RecruitmentManager => "Recruitment Manager",
        }
    }
}

impl fmt::Display for DashboardRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for DashboardRole {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "admin" => Ok(Self::Admin),
            "am" | "account_manager" => Ok(Self::AccountManager),
            "recruiter" => Ok(Self::Recruiter),
            "rm" | "recruitment_manager" => Ok(Self::RecruitmentManager),
            other => Err(format!(
                "unknown role '{other}' (expected admin, am, recruiter or rm)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("start date {start} is after end date {end}")]
pub struct DateRangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Inclusive reporting window sent as `start_date` / `end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
        ]
    }
}

/// Filters accepted by the performance endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceFilters {
    pub range: Option<DateRange>,
    pub client_id: Option<String>,
    pub team_id: Option<String>,
}

impl PerformanceFilters {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.range.map(|range| range.query()).unwrap_or_default();
        if let Some(client_id) = self.client_id.as_deref().filter(|id| !id.is_empty()) {
            pairs.push(("client_id", client_id.to_string()));
        }
        if let Some(team_id) = self.team_id.as_deref().filter(|id| !id.is_empty()) {
            pairs.push(("team_id", team_id.to_string()));
        }
        pairs
    }
}

/// `GET /api/am/ebes-score`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EbesScoreResponse {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub performance_label: String,
}

impl EbesScoreResponse {
    pub fn label(&self) -> Option<PerformanceLabel> {
        PerformanceLabel::from_label(&self.performance_label)
    }
}

/// `GET /api/{role}/analytics`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default)]
    pub clients: Vec<ClientMetrics>,
    #[serde(default)]
    pub summary: MetricSnapshot,
}

/// `GET /api/{role}/performance`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResponse {
    #[serde(default)]
    pub overview: MetricSnapshot,
    #[serde(default)]
    pub client_performance: Vec<ClientMetrics>,
    #[serde(default)]
    pub team_performance: Vec<TeamMetrics>,
}

impl PerformanceResponse {
    pub fn client_names(&self) -> Vec<String> {
        names(self.client_performance.iter().map(|row| row.client_name.as_str()))
    }

    pub fn team_names(&self) -> Vec<String> {
        names(self.team_performance.iter().map(|row| row.team_name.as_str()))
    }
}

fn names<'a>(rows: impl Iterator<Item = &'a str>) -> Vec<String> {
    rows.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
