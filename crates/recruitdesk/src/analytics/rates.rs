use std::fmt;

use serde::{Serialize, Serializer};

use super::snapshot::{MetricField, MetricSnapshot};

/// Sums one counter across a set of snapshots. Empty input yields zero and the
/// total saturates at `u64::MAX`.
pub fn sum_field<'a, I>(records: I, field: MetricField) -> u64
where
    I: IntoIterator<Item = &'a MetricSnapshot>,
{
    records
        .into_iter()
        .map(|record| record.get(field))
        .fold(0, u64::saturating_add)
}

/// Percentage of `numerator` over `denominator`; a zero denominator yields zero.
pub fn conversion_rate(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64 * 100.0
    } else {
        0.0
    }
}

/// Display form used on every dashboard: one decimal, or a bare `0%` when
/// there is nothing to divide by.
pub fn format_rate(numerator: u64, denominator: u64) -> String {
    if denominator > 0 {
        format!("{:.1}%", conversion_rate(numerator, denominator))
    } else {
        "0%".to_string()
    }
}

/// Period-over-period change of a counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Growth {
    /// Both periods are empty.
    Flat,
    /// Activity appeared where the previous period had none.
    FromZero,
    /// Percentage delta against a non-zero previous value, one decimal.
    Delta(f64),
}

/// Zero previous periods never divide: `0 -> 0` is flat and `0 -> n` reads as +100%.
pub fn growth_percentage(current: f64, previous: f64) -> Growth {
    if previous == 0.0 {
        return if current > 0.0 {
            Growth::FromZero
        } else {
            Growth::Flat
        };
    }

    let delta = ((current - previous) / previous * 100.0 * 10.0).round() / 10.0;
    // avoid rendering "-0.0%"
    Growth::Delta(if delta == 0.0 { 0.0 } else { delta })
}

impl fmt::Display for Growth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Growth::Flat => f.write_str("0%"),
            Growth::FromZero => f.write_str("+100%"),
            Growth::Delta(delta) if *delta > 0.0 => write!(f, "+{delta:.1}%"),
            Growth::Delta(delta) => write!(f, "{delta:.1}%"),
        }
    }
}

impl Serialize for Growth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_zero_for_any_numerator() {
        for numerator in [0, 1, 17, u64::from(u32::MAX)] {
            assert_eq!(conversion_rate(numerator, 0), 0.0);
        }
    }

    #[test]
    fn conversion_rate_is_a_percentage() {
        assert_eq!(conversion_rate(10, 50), 20.0);
        assert_eq!(conversion_rate(3, 3), 100.0);
    }

    #[test]
    fn formatted_rate_matches_dashboard_strings() {
        assert_eq!(format_rate(10, 50), "20.0%");
        assert_eq!(format_rate(0, 0), "0%");
        assert_eq!(format_rate(7, 0), "0%");
        assert_eq!(format_rate(0, 4), "0.0%");
        assert_eq!(format_rate(1, 3), "33.3%");
    }

    #[test]
    fn growth_handles_empty_previous_period() {
        assert_eq!(growth_percentage(0.0, 0.0).to_string(), "0%");
        assert_eq!(growth_percentage(1.0, 0.0).to_string(), "+100%");
        assert_eq!(growth_percentage(250.0, 0.0).to_string(), "+100%");
    }

    #[test]
    fn growth_rounds_deltas_to_one_decimal() {
        assert_eq!(growth_percentage(15.0, 12.0).to_string(), "+25.0%");
        assert_eq!(growth_percentage(7.0, 8.0).to_string(), "-12.5%");
        assert_eq!(growth_percentage(2.0, 3.0).to_string(), "-33.3%");
        assert_eq!(growth_percentage(5.0, 5.0).to_string(), "0.0%");
        assert_eq!(growth_percentage(0.0, 4.0).to_string(), "-100.0%");
    }

    #[test]
    fn sums_fields_across_records() {
        let records = [
            MetricSnapshot {
                total_roles: 4,
                deal_roles: 1,
                ..MetricSnapshot::default()
            },
            MetricSnapshot {
                total_roles: 6,
                ..MetricSnapshot::default()
            },
        ];
        assert_eq!(sum_field(&records, MetricField::TotalRoles), 10);
        assert_eq!(sum_field(&records, MetricField::DealRoles), 1);
        let empty: [MetricSnapshot; 0] = [];
        assert_eq!(sum_field(&empty, MetricField::LostRoles), 0);
    }

    #[test]
    fn sum_saturates_on_oversized_counters() {
        let records = [
            MetricSnapshot {
                total_roles: u64::MAX,
                ..MetricSnapshot::default()
            },
            MetricSnapshot {
                total_roles: 3,
                ..MetricSnapshot::default()
            },
        ];
        assert_eq!(sum_field(&records, MetricField::TotalRoles), u64::MAX);
    }
}
