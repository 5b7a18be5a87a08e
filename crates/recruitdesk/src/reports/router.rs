use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::export::{export_report, ExportFormat};
use super::table::ReportInput;
use crate::analytics::{
    client_health, rank_clients, rank_teams, ClientHealthEntry, ClientMetrics, DashboardSummary,
    EbesWeights, MetricSnapshot, ScoreBands, TeamMetrics,
};
use crate::error::AppError;

/// Scoring settings shared by the report endpoints.
#[derive(Debug, Clone, Default)]
pub struct ReportingState {
    pub weights: EbesWeights,
    pub bands: Option<ScoreBands>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    pub fields: Vec<String>,
    pub format: ExportFormat,
    pub report: ReportInput,
    #[serde(default)]
    pub generated_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRequest {
    pub snapshot: MetricSnapshot,
    #[serde(default)]
    pub previous: Option<MetricSnapshot>,
    #[serde(default)]
    pub clients: Vec<ClientMetrics>,
    #[serde(default)]
    pub teams: Vec<TeamMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary: DashboardSummary,
    pub client_health: Vec<ClientHealthEntry>,
    pub clients: Vec<ClientMetrics>,
    pub teams: Vec<TeamMetrics>,
}

/// Stateless export and summary endpoints over caller-supplied metrics.
pub fn report_router(state: Arc<ReportingState>) -> Router {
    Router::new()
        .route("/api/v1/reports/export", post(export_handler))
        .route("/api/v1/analytics/summary", post(summary_handler))
        .with_state(state)
}

pub(crate) async fn export_handler(
    Json(request): Json<ExportRequest>,
) -> Response {
    let generated_on = request
        .generated_on
        .unwrap_or_else(|| Local::now().date_naive());

    match export_report(&request.fields, &request.report, request.format, generated_on) {
        Ok(artifact) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, artifact.content_type),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.file_name),
                ),
            ],
            artifact.body,
        )
            .into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn summary_handler(
    State(state): State<Arc<ReportingState>>,
    Json(request): Json<SummaryRequest>,
) -> Response {
    let SummaryRequest {
        snapshot,
        previous,
        clients,
        teams,
    } = request;

    let summary = DashboardSummary::build(
        snapshot,
        previous.as_ref(),
        &state.weights,
        state.bands.as_ref(),
    );
    let response = SummaryResponse {
        summary,
        client_health: client_health(&clients),
        clients: rank_clients(clients),
        teams: rank_teams(teams),
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        report_router(Arc::new(ReportingState::default()))
    }

    fn post_json(uri: &str, payload: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[tokio::test]
    async fn export_route_returns_download() {
        let response = router()
            .oneshot(post_json(
                "/api/v1/reports/export",
                json!({
                    "fields": ["total_roles", "deals"],
                    "format": "csv",
                    "generated_on": "2026-10-16",
                    "report": {
                        "role": "recruiter",
                        "snapshot": { "total_roles": 7, "total_deals": 3 }
                    }
                }),
            ))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE].to_str().expect("ascii"),
            "text/csv"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .expect("ascii"),
            "attachment; filename=\"recruiter-report-2026-10-16.csv\""
        );
        assert_eq!(body_text(response).await, "Total Roles,Deals\n7,3");
    }

    #[tokio::test]
    async fn export_route_rejects_empty_selection() {
        let response = router()
            .oneshot(post_json(
                "/api/v1/reports/export",
                json!({
                    "fields": ["unknown"],
                    "format": "excel",
                    "report": { "role": "admin" }
                }),
            ))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).expect("json error");
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("at least one"));
    }

    #[tokio::test]
    async fn summary_route_scores_and_tags_clients() {
        let response = router()
            .oneshot(post_json(
                "/api/v1/analytics/summary",
                json!({
                    "snapshot": { "total_roles": 50, "deal_roles": 10, "lost_roles": 2 },
                    "previous": { "total_roles": 40, "deal_roles": 0 },
                    "clients": [
                        { "client_name": "Globex", "total_roles": 4 },
                        { "client_name": "Northwind", "total_roles": 10, "deals": 3 }
                    ]
                }),
            ))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).expect("json body");

        assert_eq!(body["summary"]["score"]["total"], json!(196.0));
        assert_eq!(body["clients"][0]["client_name"], "Northwind");
        assert_eq!(body["client_health"][0]["health_label"], "At Risk Account");
        assert_eq!(body["client_health"][1]["health_label"], "Strong");

        let growth = body["summary"]["growth"].as_array().expect("growth rows");
        let total_roles = growth
            .iter()
            .find(|row| row["field"] == "total_roles")
            .expect("total roles growth");
        assert_eq!(total_roles["growth"], "+25.0%");
        let deals = growth
            .iter()
            .find(|row| row["field"] == "deal_roles")
            .expect("deal growth");
        assert_eq!(deals["growth"], "+100%");
    }
}
