use serde::{Deserialize, Serialize};

use super::snapshot::MetricSnapshot;

/// Point values behind the EBES composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EbesWeights {
    pub per_role: f64,
    pub per_deal: f64,
    pub per_lost: f64,
    pub per_no_answer: f64,
    pub per_on_hold: f64,
    /// Applied once when the active pipeline is large but nothing has closed.
    pub stalled_pipeline_penalty: f64,
    pub stalled_active_threshold: u64,
}

impl Default for EbesWeights {
    fn default() -> Self {
        Self {
            per_role: 2.0,
            per_deal: 12.0,
            per_lost: -12.0,
            per_no_answer: -10.0,
            per_on_hold: -0.5,
            stalled_pipeline_penalty: -20.0,
            stalled_active_threshold: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Roles,
    Deals,
    Lost,
    NoAnswer,
    OnHold,
    StalledPipeline,
}

impl ScoreCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Roles => "Roles",
            Self::Deals => "Deals",
            Self::Lost => "Lost",
            Self::NoAnswer => "No Answer",
            Self::OnHold => "On Hold",
            Self::StalledPipeline => "Stalled Pipeline",
        }
    }
}

/// Discrete contribution to the composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub category: ScoreCategory,
    pub category_label: &'static str,
    pub count: u64,
    pub points: f64,
}

/// Unclamped EBES total with the trail of contributions that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeScore {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

impl EbesWeights {
    pub fn score(&self, snapshot: &MetricSnapshot) -> CompositeScore {
        let mut components = vec![
            component(ScoreCategory::Roles, snapshot.total_roles, self.per_role),
            component(ScoreCategory::Deals, snapshot.deal_roles, self.per_deal),
            component(ScoreCategory::Lost, snapshot.lost_roles, self.per_lost),
            component(
                ScoreCategory::NoAnswer,
                snapshot.no_answer_roles,
                self.per_no_answer,
            ),
            component(ScoreCategory::OnHold, snapshot.on_hold_roles, self.per_on_hold),
        ];

        if snapshot.active_roles > self.stalled_active_threshold && snapshot.deal_roles == 0 {
            components.push(ScoreComponent {
                category: ScoreCategory::StalledPipeline,
                category_label: ScoreCategory::StalledPipeline.label(),
                count: 1,
                points: self.stalled_pipeline_penalty,
            });
        }

        let total = components.iter().map(|component| component.points).sum();
        CompositeScore { total, components }
    }
}

fn component(category: ScoreCategory, count: u64, weight: f64) -> ScoreComponent {
    ScoreComponent {
        category,
        category_label: category.label(),
        count,
        points: count as f64 * weight,
    }
}

/// EBES score with the standard point values.
pub fn composite_score(snapshot: &MetricSnapshot) -> CompositeScore {
    EbesWeights::default().score(snapshot)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLabel {
    Excellent,
    Strong,
    Average,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl PerformanceLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Strong => "Strong",
            Self::Average => "Average",
            Self::AtRisk => "At Risk",
        }
    }

    /// Reads the label string returned by the scoring endpoint.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "excellent" => Some(Self::Excellent),
            "strong" => Some(Self::Strong),
            "average" => Some(Self::Average),
            "at risk" => Some(Self::AtRisk),
            _ => None,
        }
    }
}

/// Lower bounds (inclusive) for each label. The scoring endpoint owns these
/// values, so they are only ever supplied by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBands {
    pub excellent: f64,
    pub strong: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreBandsError {
    #[error("expected 'name=value' pairs, got '{0}'")]
    MalformedPair(String),
    #[error("unknown band '{0}' (expected excellent, strong or average)")]
    UnknownBand(String),
    #[error("band '{band}' has a non-numeric cutoff '{value}'")]
    InvalidCutoff { band: String, value: String },
    #[error("band '{0}' is missing")]
    MissingBand(&'static str),
    #[error("cutoffs must descend: excellent > strong > average")]
    NotDescending,
}

impl ScoreBands {
    pub fn new(excellent: f64, strong: f64, average: f64) -> Result<Self, ScoreBandsError> {
        if !(excellent > strong && strong > average) {
            return Err(ScoreBandsError::NotDescending);
        }
        Ok(Self {
            excellent,
            strong,
            average,
        })
    }

    /// Parses `excellent=80,strong=60,average=40` in any order.
    pub fn parse(raw: &str) -> Result<Self, ScoreBandsError> {
        let mut excellent = None;
        let mut strong = None;
        let mut average = None;

        for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| ScoreBandsError::MalformedPair(pair.to_string()))?;
            let name = name.trim().to_ascii_lowercase();
            let cutoff =
                value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ScoreBandsError::InvalidCutoff {
                        band: name.clone(),
                        value: value.trim().to_string(),
                    })?;
            match name.as_str() {
                "excellent" => excellent = Some(cutoff),
                "strong" => strong = Some(cutoff),
                "average" => average = Some(cutoff),
                _ => return Err(ScoreBandsError::UnknownBand(name)),
            }
        }

        Self::new(
            excellent.ok_or(ScoreBandsError::MissingBand("excellent"))?,
            strong.ok_or(ScoreBandsError::MissingBand("strong"))?,
            average.ok_or(ScoreBandsError::MissingBand("average"))?,
        )
    }

    pub fn classify(&self, score: f64) -> PerformanceLabel {
        if score >= self.excellent {
            PerformanceLabel::Excellent
        } else if score >= self.strong {
            PerformanceLabel::Strong
        } else if score >= self.average {
            PerformanceLabel::Average
        } else {
            PerformanceLabel::AtRisk
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(score: &CompositeScore, category: ScoreCategory) -> Option<f64> {
        score
            .components
            .iter()
            .find(|component| component.category == category)
            .map(|component| component.points)
    }

    #[test]
    fn weighs_each_category() {
        let snapshot = MetricSnapshot {
            total_roles: 10,
            active_roles: 4,
            deal_roles: 2,
            lost_roles: 1,
            no_answer_roles: 1,
            on_hold_roles: 3,
            ..MetricSnapshot::default()
        };

        let score = composite_score(&snapshot);
        // 20 + 24 - 12 - 10 - 1.5
        assert_eq!(score.total, 20.5);
        assert_eq!(points(&score, ScoreCategory::Deals), Some(24.0));
        assert_eq!(points(&score, ScoreCategory::StalledPipeline), None);
    }

    #[test]
    fn stalled_penalty_needs_both_conditions() {
        let stalled = MetricSnapshot {
            total_roles: 16,
            active_roles: 16,
            ..MetricSnapshot::default()
        };
        assert_eq!(composite_score(&stalled).total, 32.0 - 20.0);

        let closing = MetricSnapshot {
            deal_roles: 1,
            ..stalled
        };
        assert_eq!(composite_score(&closing).total, 32.0 + 12.0);

        let at_threshold = MetricSnapshot {
            total_roles: 15,
            active_roles: 15,
            ..MetricSnapshot::default()
        };
        assert_eq!(composite_score(&at_threshold).total, 30.0);
    }

    #[test]
    fn score_is_not_clamped() {
        let snapshot = MetricSnapshot {
            lost_roles: 5,
            no_answer_roles: 5,
            ..MetricSnapshot::default()
        };
        assert_eq!(composite_score(&snapshot).total, -110.0);
    }

    #[test]
    fn parses_bands_in_any_order() {
        let bands = ScoreBands::parse("average=20, excellent=75,strong=50").expect("parses");
        assert_eq!(bands.classify(80.0), PerformanceLabel::Excellent);
        assert_eq!(bands.classify(75.0), PerformanceLabel::Excellent);
        assert_eq!(bands.classify(50.0), PerformanceLabel::Strong);
        assert_eq!(bands.classify(20.0), PerformanceLabel::Average);
        assert_eq!(bands.classify(-3.0), PerformanceLabel::AtRisk);
    }

    #[test]
    fn rejects_incomplete_or_unordered_bands() {
        assert_eq!(
            ScoreBands::parse("excellent=80,strong=60"),
            Err(ScoreBandsError::MissingBand("average"))
        );
        assert_eq!(
            ScoreBands::parse("excellent=10,strong=60,average=40"),
            Err(ScoreBandsError::NotDescending)
        );
        assert!(matches!(
            ScoreBands::parse("stellar=99"),
            Err(ScoreBandsError::UnknownBand(_))
        ));
    }

    #[test]
    fn reads_server_labels() {
        assert_eq!(
            PerformanceLabel::from_label("At Risk"),
            Some(PerformanceLabel::AtRisk)
        );
        assert_eq!(
            PerformanceLabel::from_label("at_risk"),
            Some(PerformanceLabel::AtRisk)
        );
        assert_eq!(
            PerformanceLabel::from_label(" Strong "),
            Some(PerformanceLabel::Strong)
        );
        assert_eq!(PerformanceLabel::from_label("Legendary"), None);
    }
}
