use serde::{Deserialize, Deserializer, Serialize};

/// Pipeline counters for one filter (client, team, date range) as returned by
/// the analytics and performance endpoints.
///
/// Every counter decodes leniently: missing fields, `null`, negative numbers
/// and non-numeric strings all become zero. Deals may arrive as `deal_roles`,
/// `total_deals` or `deals`; the first non-zero one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct MetricSnapshot {
    pub total_roles: u64,
    pub active_roles: u64,
    pub deal_roles: u64,
    pub lost_roles: u64,
    pub on_hold_roles: u64,
    pub cancelled_roles: u64,
    pub no_answer_roles: u64,
    pub interview_1_count: u64,
    pub interview_2_count: u64,
    pub interview_3_count: u64,
    pub total_interviews: u64,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default, deserialize_with = "lenient_count")]
    total_roles: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    active_roles: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    deal_roles: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    total_deals: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    deals: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    lost_roles: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    on_hold_roles: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    cancelled_roles: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    no_answer_roles: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    interview_1_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    interview_2_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    interview_3_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    total_interviews: u64,
}

impl From<RawSnapshot> for MetricSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        let deal_roles = [raw.deal_roles, raw.total_deals, raw.deals]
            .into_iter()
            .find(|count| *count > 0)
            .unwrap_or(0);
        Self {
            total_roles: raw.total_roles,
            active_roles: raw.active_roles,
            deal_roles,
            lost_roles: raw.lost_roles,
            on_hold_roles: raw.on_hold_roles,
            cancelled_roles: raw.cancelled_roles,
            no_answer_roles: raw.no_answer_roles,
            interview_1_count: raw.interview_1_count,
            interview_2_count: raw.interview_2_count,
            interview_3_count: raw.interview_3_count,
            total_interviews: raw.total_interviews,
        }
    }
}

/// Addressable counter of a [`MetricSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    TotalRoles,
    ActiveRoles,
    DealRoles,
    LostRoles,
    OnHoldRoles,
    CancelledRoles,
    NoAnswerRoles,
    Interview1Count,
    Interview2Count,
    Interview3Count,
    TotalInterviews,
}

impl MetricField {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::TotalRoles,
            Self::ActiveRoles,
            Self::DealRoles,
            Self::LostRoles,
            Self::OnHoldRoles,
            Self::CancelledRoles,
            Self::NoAnswerRoles,
            Self::Interview1Count,
            Self::Interview2Count,
            Self::Interview3Count,
            Self::TotalInterviews,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::TotalRoles => "total_roles",
            Self::ActiveRoles => "active_roles",
            Self::DealRoles => "deal_roles",
            Self::LostRoles => "lost_roles",
            Self::OnHoldRoles => "on_hold_roles",
            Self::CancelledRoles => "cancelled_roles",
            Self::NoAnswerRoles => "no_answer_roles",
            Self::Interview1Count => "interview_1_count",
            Self::Interview2Count => "interview_2_count",
            Self::Interview3Count => "interview_3_count",
            Self::TotalInterviews => "total_interviews",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TotalRoles => "Total Roles",
            Self::ActiveRoles => "Active Roles",
            Self::DealRoles => "Deals",
            Self::LostRoles => "Lost Roles",
            Self::OnHoldRoles => "On Hold Roles",
            Self::CancelledRoles => "Cancelled Roles",
            Self::NoAnswerRoles => "No Answer Roles",
            Self::Interview1Count => "Interview 1",
            Self::Interview2Count => "Interview 2",
            Self::Interview3Count => "Interview 3",
            Self::TotalInterviews => "Total Interviews",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|field| field.key() == key)
    }
}

impl MetricSnapshot {
    pub const fn get(&self, field: MetricField) -> u64 {
        match field {
            MetricField::TotalRoles => self.total_roles,
            MetricField::ActiveRoles => self.active_roles,
            MetricField::DealRoles => self.deal_roles,
            MetricField::LostRoles => self.lost_roles,
            MetricField::OnHoldRoles => self.on_hold_roles,
            MetricField::CancelledRoles => self.cancelled_roles,
            MetricField::NoAnswerRoles => self.no_answer_roles,
            MetricField::Interview1Count => self.interview_1_count,
            MetricField::Interview2Count => self.interview_2_count,
            MetricField::Interview3Count => self.interview_3_count,
            MetricField::TotalInterviews => self.total_interviews,
        }
    }

    /// Interviews across all levels; falls back to the per-level counts when
    /// the backend omits `total_interviews`.
    pub fn interviews(&self) -> u64 {
        if self.total_interviews > 0 {
            self.total_interviews
        } else {
            self.interview_1_count
                .saturating_add(self.interview_2_count)
                .saturating_add(self.interview_3_count)
        }
    }

    /// Field-wise sum, used to roll client rows up into an overview. Saturates
    /// at `u64::MAX`.
    pub fn merge(&self, other: &MetricSnapshot) -> MetricSnapshot {
        MetricSnapshot {
            total_roles: self.total_roles.saturating_add(other.total_roles),
            active_roles: self.active_roles.saturating_add(other.active_roles),
            deal_roles: self.deal_roles.saturating_add(other.deal_roles),
            lost_roles: self.lost_roles.saturating_add(other.lost_roles),
            on_hold_roles: self.on_hold_roles.saturating_add(other.on_hold_roles),
            cancelled_roles: self.cancelled_roles.saturating_add(other.cancelled_roles),
            no_answer_roles: self.no_answer_roles.saturating_add(other.no_answer_roles),
            interview_1_count: self.interview_1_count.saturating_add(other.interview_1_count),
            interview_2_count: self.interview_2_count.saturating_add(other.interview_2_count),
            interview_3_count: self.interview_3_count.saturating_add(other.interview_3_count),
            total_interviews: self.total_interviews.saturating_add(other.total_interviews),
        }
    }
}

impl MetricSnapshot {
    /// Combined counters of a breakdown table.
    pub fn roll_up<'a, I>(rows: I) -> MetricSnapshot
    where
        I: IntoIterator<Item = &'a MetricSnapshot>,
    {
        rows.into_iter()
            .fold(MetricSnapshot::default(), |total, row| total.merge(row))
    }

    pub fn is_empty(&self) -> bool {
        *self == MetricSnapshot::default()
    }
}

/// One row of the per-client breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMetrics {
    #[serde(default, alias = "name")]
    pub client_name: String,
    #[serde(flatten)]
    pub metrics: MetricSnapshot,
}

/// One row of the per-team breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMetrics {
    #[serde(default, alias = "name")]
    pub team_name: String,
    #[serde(flatten)]
    pub metrics: MetricSnapshot,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Unsigned(u64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match LenientNumber::deserialize(deserializer)? {
        LenientNumber::Unsigned(value) => value,
        LenientNumber::Float(value) => float_to_count(value),
        LenientNumber::Text(raw) => raw.trim().parse::<f64>().map(float_to_count).unwrap_or(0),
        LenientNumber::Other(_) => 0,
    };
    Ok(value)
}

fn float_to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}
