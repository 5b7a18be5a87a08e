use serde::{Deserialize, Serialize};

use super::table::{ReportCell, ReportInput};
use crate::analytics::{format_rate, DerivedMetricKind, MetricSnapshot};

/// Selectable report columns. Each key expands to one to three headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    UserName,
    UserCode,
    Email,
    UserDetails,
    Teams,
    Clients,
    TotalRoles,
    ActiveRoles,
    Deals,
    LostRoles,
    OnHoldRoles,
    CancelledRoles,
    NoAnswerRoles,
    Interviews,
    TotalInterviews,
    RolesToDealConversion,
    InterviewConversion,
    DropOff,
    EbesScore,
}

impl ReportField {
    pub const fn ordered() -> [Self; 19] {
        [
            Self::UserName,
            Self::UserCode,
            Self::Email,
            Self::UserDetails,
            Self::Teams,
            Self::Clients,
            Self::TotalRoles,
            Self::ActiveRoles,
            Self::Deals,
            Self::LostRoles,
            Self::OnHoldRoles,
            Self::CancelledRoles,
            Self::NoAnswerRoles,
            Self::Interviews,
            Self::TotalInterviews,
            Self::RolesToDealConversion,
            Self::InterviewConversion,
            Self::DropOff,
            Self::EbesScore,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::UserName => "user_name",
            Self::UserCode => "user_code",
            Self::Email => "email",
            Self::UserDetails => "user_details",
            Self::Teams => "teams",
            Self::Clients => "clients",
            Self::TotalRoles => "total_roles",
            Self::ActiveRoles => "active_roles",
            Self::Deals => "deals",
            Self::LostRoles => "lost_roles",
            Self::OnHoldRoles => "on_hold_roles",
            Self::CancelledRoles => "cancelled_roles",
            Self::NoAnswerRoles => "no_answer_roles",
            Self::Interviews => "interviews",
            Self::TotalInterviews => "total_interviews",
            Self::RolesToDealConversion => "roles_to_deal_conversion",
            Self::InterviewConversion => "interview_conversion",
            Self::DropOff => "drop_off",
            Self::EbesScore => "ebes_score",
        }
    }

    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::UserName => &["Name"],
            Self::UserCode => &["User Code"],
            Self::Email => &["Email"],
            Self::UserDetails => &["Name", "User Code", "Email"],
            Self::Teams => &["Teams"],
            Self::Clients => &["Clients"],
            Self::TotalRoles => &["Total Roles"],
            Self::ActiveRoles => &["Active Roles"],
            Self::Deals => &["Deals"],
            Self::LostRoles => &["Lost Roles"],
            Self::OnHoldRoles => &["On Hold Roles"],
            Self::CancelledRoles => &["Cancelled Roles"],
            Self::NoAnswerRoles => &["No Answer Roles"],
            Self::Interviews => &["Interview 1", "Interview 2", "Interview 3"],
            Self::TotalInterviews => &["Total Interviews"],
            Self::RolesToDealConversion => &["Roles to Deal Conversion"],
            Self::InterviewConversion => {
                &["Interview 1 to 2 Conversion", "Interview 2 to 3 Conversion"]
            }
            Self::DropOff => &["Loss Rate", "No Answer Rate"],
            Self::EbesScore => &["EBES Score", "Performance Label"],
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ordered().into_iter().find(|field| field.key() == key)
    }

    /// Cells for this field, one per header.
    pub(crate) fn cells(self, input: &ReportInput) -> Vec<ReportCell> {
        let snapshot = &input.snapshot;
        let identity = &input.user;
        match self {
            Self::UserName => vec![ReportCell::quoted(&identity.name)],
            Self::UserCode => vec![ReportCell::plain(&identity.user_code)],
            Self::Email => vec![ReportCell::plain(&identity.email)],
            Self::UserDetails => vec![
                ReportCell::quoted(&identity.name),
                ReportCell::plain(&identity.user_code),
                ReportCell::plain(&identity.email),
            ],
            Self::Teams => vec![ReportCell::quoted(input.teams.join(", "))],
            Self::Clients => vec![ReportCell::quoted(input.clients.join(", "))],
            Self::TotalRoles => vec![ReportCell::count(snapshot.total_roles)],
            Self::ActiveRoles => vec![ReportCell::count(snapshot.active_roles)],
            Self::Deals => vec![ReportCell::count(snapshot.deal_roles)],
            Self::LostRoles => vec![ReportCell::count(snapshot.lost_roles)],
            Self::OnHoldRoles => vec![ReportCell::count(snapshot.on_hold_roles)],
            Self::CancelledRoles => vec![ReportCell::count(snapshot.cancelled_roles)],
            Self::NoAnswerRoles => vec![ReportCell::count(snapshot.no_answer_roles)],
            Self::Interviews => vec![
                ReportCell::count(snapshot.interview_1_count),
                ReportCell::count(snapshot.interview_2_count),
                ReportCell::count(snapshot.interview_3_count),
            ],
            Self::TotalInterviews => vec![ReportCell::count(snapshot.interviews())],
            Self::RolesToDealConversion => {
                vec![rate_cell(DerivedMetricKind::RolesToDealConversion, snapshot)]
            }
            Self::InterviewConversion => vec![
                rate_cell(DerivedMetricKind::Interview1To2Conversion, snapshot),
                rate_cell(DerivedMetricKind::Interview2To3Conversion, snapshot),
            ],
            Self::DropOff => vec![
                rate_cell(DerivedMetricKind::LossRate, snapshot),
                rate_cell(DerivedMetricKind::NoAnswerRate, snapshot),
            ],
            Self::EbesScore => match &input.score {
                Some(score) => vec![
                    ReportCell::plain(score.score.to_string()),
                    ReportCell::plain(&score.performance_label),
                ],
                None => vec![ReportCell::plain("N/A"), ReportCell::plain("N/A")],
            },
        }
    }
}

fn rate_cell(kind: DerivedMetricKind, snapshot: &MetricSnapshot) -> ReportCell {
    let (numerator, denominator) = kind.operands(snapshot);
    ReportCell::plain(format_rate(numerator, denominator))
}
