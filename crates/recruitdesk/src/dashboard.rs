//! Fetch-and-reduce flow behind every dashboard view: pull the role's
//! performance payload, derive percentages and the EBES breakdown, tag client
//! health and rank the breakdown tables. A payload without an overview falls
//! back to the sum of its client rows.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::analytics::{
    client_health, rank_clients, rank_teams, ClientHealthEntry, ClientMetrics, DashboardSummary,
    EbesWeights, MetricSnapshot, ScoreBands, TeamMetrics,
};
use crate::api::{
    ApiError, CrmClient, DashboardRole, EbesScoreResponse, PerformanceFilters, Transport,
};
use crate::reports::{ReportIdentity, ReportInput, ReportScore};
use crate::session::SessionStore;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub role: DashboardRole,
    pub user: ReportIdentity,
    pub summary: DashboardSummary,
    pub client_health: Vec<ClientHealthEntry>,
    pub clients: Vec<ClientMetrics>,
    pub teams: Vec<TeamMetrics>,
    /// Present for account managers only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebes: Option<EbesScoreResponse>,
}

impl DashboardView {
    /// Locally configured bands win over the backend label when both exist.
    pub fn performance_label(&self) -> Option<String> {
        self.summary
            .performance_label
            .map(|label| label.label().to_string())
            .or_else(|| {
                self.ebes
                    .as_ref()
                    .map(|score| score.performance_label.clone())
                    .filter(|label| !label.trim().is_empty())
            })
    }

    pub fn report_input(&self) -> ReportInput {
        let score = self.ebes.as_ref().map(|ebes| ReportScore {
            score: ebes.score,
            performance_label: self
                .performance_label()
                .unwrap_or_else(|| ebes.performance_label.clone()),
        });
        ReportInput {
            role: self.role,
            user: self.user.clone(),
            snapshot: self.summary.snapshot,
            teams: names(self.teams.iter().map(|team| team.team_name.as_str())),
            clients: names(self.clients.iter().map(|client| client.client_name.as_str())),
            score,
        }
    }
}

fn names<'a>(rows: impl Iterator<Item = &'a str>) -> Vec<String> {
    rows.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct DashboardService<T, S> {
    client: Arc<CrmClient<T, S>>,
    weights: EbesWeights,
    bands: Option<ScoreBands>,
}

impl<T, S> DashboardService<T, S>
where
    T: Transport,
    S: SessionStore,
{
    pub fn new(client: Arc<CrmClient<T, S>>, weights: EbesWeights, bands: Option<ScoreBands>) -> Self {
        Self {
            client,
            weights,
            bands,
        }
    }

    pub fn client(&self) -> &CrmClient<T, S> {
        &self.client
    }

    pub async fn load(
        &self,
        role: DashboardRole,
        filters: &PerformanceFilters,
    ) -> Result<DashboardView, ApiError> {
        let user = self.client.current_user()?;
        let performance = self.client.performance(role, filters).await?;

        let ebes = if role == DashboardRole::AccountManager {
            match self.client.ebes_score(filters.range.as_ref()).await {
                Ok(score) => Some(score),
                Err(err @ (ApiError::SessionExpired { .. } | ApiError::Session(_))) => {
                    return Err(err)
                }
                Err(err) => {
                    warn!(error = %err, "EBES score unavailable; continuing without it");
                    None
                }
            }
        } else {
            None
        };

        let overview = if performance.overview.is_empty() {
            MetricSnapshot::roll_up(
                performance
                    .client_performance
                    .iter()
                    .map(|row| &row.metrics),
            )
        } else {
            performance.overview
        };
        let summary = DashboardSummary::build(
            overview,
            None,
            &self.weights,
            self.bands.as_ref(),
        );
        let client_health = client_health(&performance.client_performance);

        info!(
            role = %role,
            clients = performance.client_performance.len(),
            teams = performance.team_performance.len(),
            composite = summary.score.total,
            "dashboard loaded"
        );

        Ok(DashboardView {
            role,
            user: ReportIdentity::from(&user),
            summary,
            client_health,
            clients: rank_clients(performance.client_performance),
            teams: rank_teams(performance.team_performance),
            ebes,
        })
    }
}
