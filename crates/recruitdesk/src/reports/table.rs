use serde::{Deserialize, Serialize};

use super::fields::ReportField;
use crate::analytics::MetricSnapshot;
use crate::api::DashboardRole;
use crate::session::SessionUser;

/// Who the report was prepared for; printed on every export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportIdentity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_code: String,
    #[serde(default)]
    pub email: String,
}

impl From<&SessionUser> for ReportIdentity {
    fn from(user: &SessionUser) -> Self {
        Self {
            name: user.name.clone(),
            user_code: user.user_code.clone(),
            email: user.email.clone(),
        }
    }
}

/// EBES figures as reported by the scoring endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportScore {
    pub score: f64,
    pub performance_label: String,
}

/// Everything an export needs besides the field selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportInput {
    pub role: DashboardRole,
    #[serde(default)]
    pub user: ReportIdentity,
    #[serde(default)]
    pub snapshot: MetricSnapshot,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub clients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ReportScore>,
}

/// Single output value. Quoted cells are wrapped in double quotes in
/// delimited output; embedded quotes are left as they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportCell {
    pub text: String,
    pub quoted: bool,
}

impl ReportCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    pub fn count(value: u64) -> Self {
        Self::plain(value.to_string())
    }

    pub fn delimited(&self) -> String {
        if self.quoted {
            format!("\"{}\"", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Header row and value row, positionally aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub fields: Vec<ReportField>,
    pub headers: Vec<&'static str>,
    pub cells: Vec<ReportCell>,
}

impl ReportTable {
    /// Unknown keys are skipped; headers and cells come from the same pass.
    pub fn build<K: AsRef<str>>(selected_fields: &[K], input: &ReportInput) -> Self {
        let mut table = ReportTable::default();
        for key in selected_fields {
            let Some(field) = ReportField::from_key(key.as_ref()) else {
                tracing::debug!(key = key.as_ref(), "dropping unknown report field");
                continue;
            };
            let headers = field.headers();
            let cells = field.cells(input);
            debug_assert_eq!(headers.len(), cells.len());
            table.fields.push(field);
            table.headers.extend_from_slice(headers);
            table.cells.extend(cells);
        }
        table
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn values(&self) -> Vec<String> {
        self.cells.iter().map(ReportCell::delimited).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn input() -> ReportInput {
        ReportInput {
            role: DashboardRole::AccountManager,
            user: ReportIdentity {
                name: "Dana Reyes".to_string(),
                user_code: "AM-07".to_string(),
                email: "dana@agency.io".to_string(),
            },
            snapshot: MetricSnapshot {
                total_roles: 50,
                active_roles: 20,
                deal_roles: 10,
                lost_roles: 5,
                no_answer_roles: 2,
                interview_1_count: 30,
                interview_2_count: 12,
                interview_3_count: 6,
                ..MetricSnapshot::default()
            },
            teams: vec!["Tech".to_string(), "Finance".to_string()],
            clients: vec!["Northwind".to_string()],
            score: None,
        }
    }

    #[test]
    fn every_field_yields_one_cell_per_header() {
        let input = input();
        for field in ReportField::ordered() {
            assert_eq!(
                field.headers().len(),
                field.cells(&input).len(),
                "{} misaligned",
                field.key()
            );
        }
    }

    #[test]
    fn unknown_keys_contribute_nothing() {
        let table = ReportTable::build(&["total_roles", "revenue", "deals"], &input());
        assert_eq!(table.headers, vec!["Total Roles", "Deals"]);
        assert_eq!(table.values(), vec!["50", "10"]);
        assert_eq!(table.fields, vec![ReportField::TotalRoles, ReportField::Deals]);
    }

    #[test]
    fn multi_column_fields_stay_aligned_in_selection_order() {
        let table = ReportTable::build(
            &["interviews", "user_details", "roles_to_deal_conversion", "ebes_score"],
            &input(),
        );
        assert_eq!(table.headers.len(), table.cells.len());
        assert_eq!(
            table.headers,
            vec![
                "Interview 1",
                "Interview 2",
                "Interview 3",
                "Name",
                "User Code",
                "Email",
                "Roles to Deal Conversion",
                "EBES Score",
                "Performance Label",
            ]
        );
        assert_eq!(
            table.values(),
            vec!["30", "12", "6", "\"Dana Reyes\"", "AM-07", "dana@agency.io", "20.0%", "N/A", "N/A"]
        );
    }

    #[test]
    fn joined_lists_are_quoted_without_escaping() {
        let mut input = input();
        input.clients = vec!["Acme \"West\"".to_string(), "Globex".to_string()];
        let table = ReportTable::build(&["teams", "clients"], &input);
        assert_eq!(
            table.values(),
            vec!["\"Tech, Finance\"", "\"Acme \"West\", Globex\""]
        );
    }

    #[test]
    fn score_cells_use_server_values() {
        let mut input = input();
        input.score = Some(ReportScore {
            score: 61.5,
            performance_label: "Strong".to_string(),
        });
        let table = ReportTable::build(&["ebes_score"], &input);
        assert_eq!(table.values(), vec!["61.5", "Strong"]);
    }
}
