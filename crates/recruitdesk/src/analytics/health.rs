use serde::Serialize;

use super::rates::conversion_rate;
use super::snapshot::{ClientMetrics, MetricSnapshot};

/// Roles-to-deal conversion at or above this marks a strong account.
pub const STRONG_ACCOUNT_CONVERSION: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthTag {
    Strong,
    Average,
    AtRiskAccount,
}

impl HealthTag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Average => "Average",
            Self::AtRiskAccount => "At Risk Account",
        }
    }

    pub fn for_snapshot(snapshot: &MetricSnapshot) -> Self {
        let conversion = conversion_rate(snapshot.deal_roles, snapshot.total_roles);
        if snapshot.deal_roles > 0 && conversion >= STRONG_ACCOUNT_CONVERSION {
            Self::Strong
        } else if snapshot.deal_roles > 0 || snapshot.interviews() > 0 {
            Self::Average
        } else {
            Self::AtRiskAccount
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientHealthEntry {
    pub client_name: String,
    pub health: HealthTag,
    pub health_label: &'static str,
    pub roles_to_deal_conversion: String,
}

pub fn client_health(clients: &[ClientMetrics]) -> Vec<ClientHealthEntry> {
    clients
        .iter()
        .map(|client| {
            let health = HealthTag::for_snapshot(&client.metrics);
            ClientHealthEntry {
                client_name: client.client_name.clone(),
                health,
                health_label: health.label(),
                roles_to_deal_conversion: super::rates::format_rate(
                    client.metrics.deal_roles,
                    client.metrics.total_roles,
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str, total_roles: u64, deal_roles: u64, interviews: u64) -> ClientMetrics {
        ClientMetrics {
            client_name: name.to_string(),
            metrics: MetricSnapshot {
                total_roles,
                deal_roles,
                total_interviews: interviews,
                ..MetricSnapshot::default()
            },
        }
    }

    #[test]
    fn buckets_clients_by_pipeline_mix() {
        let entries = client_health(&[
            client("Northwind", 10, 2, 6),
            client("Contoso", 20, 1, 3),
            client("Initech", 8, 0, 2),
            client("Globex", 5, 0, 0),
            client("Hooli", 0, 0, 0),
        ]);

        let tags: Vec<_> = entries.iter().map(|entry| entry.health).collect();
        assert_eq!(
            tags,
            vec![
                HealthTag::Strong,
                HealthTag::Average,
                HealthTag::Average,
                HealthTag::AtRiskAccount,
                HealthTag::AtRiskAccount,
            ]
        );
        assert_eq!(entries[0].roles_to_deal_conversion, "20.0%");
        assert_eq!(entries[4].roles_to_deal_conversion, "0%");
        assert_eq!(entries[3].health_label, "At Risk Account");
    }
}
