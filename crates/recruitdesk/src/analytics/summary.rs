use std::cmp::Ordering;

use serde::Serialize;

use super::rates::{conversion_rate, format_rate, growth_percentage, Growth};
use super::score::{CompositeScore, EbesWeights, PerformanceLabel, ScoreBands};
use super::snapshot::{ClientMetrics, MetricField, MetricSnapshot, TeamMetrics};

/// Percentages shown on every dashboard, each a ratio of two snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedMetricKind {
    RolesToDealConversion,
    Interview1To2Conversion,
    Interview2To3Conversion,
    InterviewToDealConversion,
    LossRate,
    NoAnswerRate,
    OnHoldRate,
    ActiveRate,
}

impl DerivedMetricKind {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::RolesToDealConversion,
            Self::Interview1To2Conversion,
            Self::Interview2To3Conversion,
            Self::InterviewToDealConversion,
            Self::LossRate,
            Self::NoAnswerRate,
            Self::OnHoldRate,
            Self::ActiveRate,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::RolesToDealConversion => "roles_to_deal_conversion",
            Self::Interview1To2Conversion => "interview_1_to_2_conversion",
            Self::Interview2To3Conversion => "interview_2_to_3_conversion",
            Self::InterviewToDealConversion => "interview_to_deal_conversion",
            Self::LossRate => "loss_rate",
            Self::NoAnswerRate => "no_answer_rate",
            Self::OnHoldRate => "on_hold_rate",
            Self::ActiveRate => "active_rate",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RolesToDealConversion => "Roles to Deal Conversion",
            Self::Interview1To2Conversion => "Interview 1 to 2 Conversion",
            Self::Interview2To3Conversion => "Interview 2 to 3 Conversion",
            Self::InterviewToDealConversion => "Interview to Deal Conversion",
            Self::LossRate => "Loss Rate",
            Self::NoAnswerRate => "No Answer Rate",
            Self::OnHoldRate => "On Hold Rate",
            Self::ActiveRate => "Active Rate",
        }
    }

    /// `(numerator, denominator)` for this ratio.
    pub fn operands(self, snapshot: &MetricSnapshot) -> (u64, u64) {
        match self {
            Self::RolesToDealConversion => (snapshot.deal_roles, snapshot.total_roles),
            Self::Interview1To2Conversion => {
                (snapshot.interview_2_count, snapshot.interview_1_count)
            }
            Self::Interview2To3Conversion => {
                (snapshot.interview_3_count, snapshot.interview_2_count)
            }
            Self::InterviewToDealConversion => (snapshot.deal_roles, snapshot.interviews()),
            Self::LossRate => (snapshot.lost_roles, snapshot.total_roles),
            Self::NoAnswerRate => (snapshot.no_answer_roles, snapshot.total_roles),
            Self::OnHoldRate => (snapshot.on_hold_roles, snapshot.total_roles),
            Self::ActiveRate => (snapshot.active_roles, snapshot.total_roles),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetric {
    pub kind: DerivedMetricKind,
    pub key: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub display: String,
}

impl DerivedMetric {
    pub fn compute(kind: DerivedMetricKind, snapshot: &MetricSnapshot) -> Self {
        let (numerator, denominator) = kind.operands(snapshot);
        Self {
            kind,
            key: kind.key(),
            label: kind.label(),
            value: conversion_rate(numerator, denominator),
            display: format_rate(numerator, denominator),
        }
    }
}

pub fn derived_metrics(snapshot: &MetricSnapshot) -> Vec<DerivedMetric> {
    DerivedMetricKind::ordered()
        .into_iter()
        .map(|kind| DerivedMetric::compute(kind, snapshot))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthEntry {
    pub field: MetricField,
    pub label: &'static str,
    pub current: u64,
    pub previous: u64,
    pub growth: Growth,
}

/// Field-by-field change between two periods.
pub fn period_growth(current: &MetricSnapshot, previous: &MetricSnapshot) -> Vec<GrowthEntry> {
    MetricField::ordered()
        .into_iter()
        .map(|field| {
            let now = current.get(field);
            let before = previous.get(field);
            GrowthEntry {
                field,
                label: field.label(),
                current: now,
                previous: before,
                growth: growth_percentage(now as f64, before as f64),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub snapshot: MetricSnapshot,
    pub derived: Vec<DerivedMetric>,
    pub score: CompositeScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_label: Option<PerformanceLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub growth: Vec<GrowthEntry>,
}

impl DashboardSummary {
    /// Without configured bands the label stays empty; callers then show the
    /// label returned by the scoring endpoint.
    pub fn build(
        snapshot: MetricSnapshot,
        previous: Option<&MetricSnapshot>,
        weights: &EbesWeights,
        bands: Option<&ScoreBands>,
    ) -> Self {
        let score = weights.score(&snapshot);
        let performance_label = bands.map(|bands| bands.classify(score.total));
        let growth = previous
            .map(|previous| period_growth(&snapshot, previous))
            .unwrap_or_default();

        Self {
            derived: derived_metrics(&snapshot),
            snapshot,
            score,
            performance_label,
            growth,
        }
    }

    pub fn metric(&self, kind: DerivedMetricKind) -> Option<&DerivedMetric> {
        self.derived.iter().find(|metric| metric.kind == kind)
    }
}

fn performance_order(a: &MetricSnapshot, b: &MetricSnapshot) -> Ordering {
    b.deal_roles.cmp(&a.deal_roles).then_with(|| {
        conversion_rate(b.deal_roles, b.total_roles)
            .partial_cmp(&conversion_rate(a.deal_roles, a.total_roles))
            .unwrap_or(Ordering::Equal)
    })
}

/// Most deals first; ties go to the better roles-to-deal conversion.
pub fn rank_clients(mut clients: Vec<ClientMetrics>) -> Vec<ClientMetrics> {
    clients.sort_by(|a, b| {
        performance_order(&a.metrics, &b.metrics).then_with(|| a.client_name.cmp(&b.client_name))
    });
    clients
}

pub fn rank_teams(mut teams: Vec<TeamMetrics>) -> Vec<TeamMetrics> {
    teams.sort_by(|a, b| {
        performance_order(&a.metrics, &b.metrics).then_with(|| a.team_name.cmp(&b.team_name))
    });
    teams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_to_deal_conversion_renders_like_the_dashboard() {
        let snapshot = MetricSnapshot {
            total_roles: 50,
            deal_roles: 10,
            ..MetricSnapshot::default()
        };
        let metric = DerivedMetric::compute(DerivedMetricKind::RolesToDealConversion, &snapshot);
        assert_eq!(metric.display, "20.0%");
        assert_eq!(metric.value, 20.0);

        let empty = DerivedMetric::compute(
            DerivedMetricKind::RolesToDealConversion,
            &MetricSnapshot::default(),
        );
        assert_eq!(empty.display, "0%");
        assert_eq!(empty.value, 0.0);
    }

    #[test]
    fn derived_catalogue_covers_every_kind_in_order() {
        let metrics = derived_metrics(&MetricSnapshot::default());
        let keys: Vec<_> = metrics.iter().map(|metric| metric.key).collect();
        assert_eq!(keys.len(), DerivedMetricKind::ordered().len());
        assert_eq!(keys[0], "roles_to_deal_conversion");
        assert!(metrics.iter().all(|metric| metric.display == "0%"));
    }

    #[test]
    fn interview_funnel_uses_previous_stage_as_denominator() {
        let snapshot = MetricSnapshot {
            interview_1_count: 8,
            interview_2_count: 4,
            interview_3_count: 1,
            deal_roles: 1,
            ..MetricSnapshot::default()
        };
        let summary =
            DashboardSummary::build(snapshot, None, &EbesWeights::default(), None);
        let display = |kind| {
            summary
                .metric(kind)
                .map(|metric| metric.display.clone())
                .unwrap_or_default()
        };
        assert_eq!(display(DerivedMetricKind::Interview1To2Conversion), "50.0%");
        assert_eq!(display(DerivedMetricKind::Interview2To3Conversion), "25.0%");
        assert_eq!(display(DerivedMetricKind::InterviewToDealConversion), "7.7%");
        assert!(summary.performance_label.is_none());
        assert!(summary.growth.is_empty());
    }

    #[test]
    fn summary_labels_and_growth_when_configured() {
        let current = MetricSnapshot {
            total_roles: 10,
            deal_roles: 3,
            ..MetricSnapshot::default()
        };
        let previous = MetricSnapshot {
            total_roles: 8,
            ..MetricSnapshot::default()
        };
        let bands = ScoreBands::new(50.0, 30.0, 10.0).expect("valid bands");
        let summary = DashboardSummary::build(
            current,
            Some(&previous),
            &EbesWeights::default(),
            Some(&bands),
        );

        assert_eq!(summary.score.total, 56.0);
        assert_eq!(summary.performance_label, Some(PerformanceLabel::Excellent));
        let roles = summary
            .growth
            .iter()
            .find(|entry| entry.field == MetricField::TotalRoles)
            .expect("roles growth");
        assert_eq!(roles.growth.to_string(), "+25.0%");
        let deals = summary
            .growth
            .iter()
            .find(|entry| entry.field == MetricField::DealRoles)
            .expect("deal growth");
        assert_eq!(deals.growth.to_string(), "+100%");
    }

    #[test]
    fn ranks_clients_by_deals_then_conversion() {
        let row = |name: &str, total_roles, deal_roles| ClientMetrics {
            client_name: name.to_string(),
            metrics: MetricSnapshot {
                total_roles,
                deal_roles,
                ..MetricSnapshot::default()
            },
        };
        let ranked = rank_clients(vec![
            row("Globex", 10, 1),
            row("Initech", 4, 2),
            row("Contoso", 20, 2),
            row("Hooli", 0, 0),
        ]);
        let names: Vec<_> = ranked.iter().map(|row| row.client_name.as_str()).collect();
        assert_eq!(names, vec!["Initech", "Contoso", "Globex", "Hooli"]);
    }
}
