// src/services/aligner.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{AlignedRow, ComparisonResult};

/// Chart-ready table: one row per distinct date, ascending, and the fund
/// columns in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignedTable {
    pub columns: Vec<String>,
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }
}

/// Merges every fund's rolling-return series into date-aligned rows. Each row
/// carries `benchmark_rate` as the flat benchmark value.
pub fn align_series(result: &ComparisonResult, benchmark_rate: f64) -> AlignedTable {
    let mut by_date: BTreeMap<NaiveDate, AlignedRow> = BTreeMap::new();

    for (code, analysis) in &result.funds {
        for point in &analysis.series_data {
            by_date
                .entry(point.date)
                .or_insert_with(|| AlignedRow::new(point.date, benchmark_rate))
                .values
                .insert(code.clone(), point.rolling_return);
        }
    }

    AlignedTable {
        columns: result.funds.keys().cloned().collect(),
        rows: by_date.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FundAnalysis, FundMetrics, FundProbabilities, SeriesPoint};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn analysis(name: &str, points: &[(&str, f64)]) -> FundAnalysis {
        FundAnalysis {
            name: name.to_string(),
            metrics: FundMetrics {
                mean: 0.12,
                std_dev: 0.08,
                min: -0.05,
                max: None,
                median: None,
            },
            probabilities: FundProbabilities {
                negative: 0.1,
                beat_benchmark: 0.7,
                beat_12pct: 0.4,
            },
            series_data: points
                .iter()
                .map(|(d, r)| SeriesPoint {
                    date: date(d),
                    rolling_return: *r,
                    nav: None,
                })
                .collect(),
            benchmark_used: None,
        }
    }

    #[test]
    fn single_fund_example() {
        let result: ComparisonResult = vec![(
            "122639".to_string(),
            analysis("Fund X", &[("2023-01-01", 0.10), ("2023-02-01", 0.11)]),
        )]
        .into_iter()
        .collect();

        let table = align_series(&result, 0.06);
        assert_eq!(table.columns, vec!["122639"]);
        assert_eq!(table.dates(), vec![date("2023-01-01"), date("2023-02-01")]);
        assert_eq!(table.rows[0].benchmark, 0.06);
        assert_eq!(table.rows[0].value("122639"), Some(0.10));
        assert_eq!(table.rows[1].benchmark, 0.06);
        assert_eq!(table.rows[1].value("122639"), Some(0.11));
    }

    #[test]
    fn partial_overlap_leaves_gaps() {
        let result: ComparisonResult = vec![
            (
                "A".to_string(),
                analysis("A", &[("2023-01-01", 0.1), ("2023-01-03", 0.3)]),
            ),
            (
                "B".to_string(),
                analysis("B", &[("2023-01-02", 0.2), ("2023-01-03", 0.4)]),
            ),
        ]
        .into_iter()
        .collect();

        let table = align_series(&result, 0.08);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].value("A"), Some(0.1));
        assert_eq!(table.rows[0].value("B"), None);
        assert_eq!(table.rows[1].value("A"), None);
        assert_eq!(table.rows[1].value("B"), Some(0.2));
        assert_eq!(table.rows[2].value("A"), Some(0.3));
        assert_eq!(table.rows[2].value("B"), Some(0.4));
    }

    #[test]
    fn unordered_input_comes_out_ascending() {
        let result: ComparisonResult = vec![
            (
                "B".to_string(),
                analysis("B", &[("2023-03-01", 0.3), ("2022-12-31", 0.0)]),
            ),
            (
                "A".to_string(),
                analysis("A", &[("2023-02-01", 0.2), ("2023-03-01", 0.1)]),
            ),
        ]
        .into_iter()
        .collect();

        let table = align_series(&result, 0.06);
        let dates = table.dates();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(dates.len(), 3);
        assert_eq!(table.columns, vec!["B", "A"]);
    }

    #[test]
    fn fund_key_only_on_its_own_dates() {
        let result: ComparisonResult = vec![
            (
                "A".to_string(),
                analysis("A", &[("2023-01-01", 0.1), ("2023-06-01", 0.2)]),
            ),
            (
                "B".to_string(),
                analysis("B", &[("2023-03-01", 0.5), ("2023-04-01", 0.6)]),
            ),
        ]
        .into_iter()
        .collect();

        let table = align_series(&result, 0.06);
        let with_a: Vec<NaiveDate> = table
            .rows
            .iter()
            .filter(|r| r.values.contains_key("A"))
            .map(|r| r.date)
            .collect();
        assert_eq!(with_a, vec![date("2023-01-01"), date("2023-06-01")]);
    }

    #[test]
    fn later_duplicate_point_wins() {
        let result: ComparisonResult = vec![(
            "A".to_string(),
            analysis("A", &[("2023-01-01", 0.1), ("2023-01-01", 0.15)]),
        )]
        .into_iter()
        .collect();

        let table = align_series(&result, 0.06);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].value("A"), Some(0.15));
    }

    #[test]
    fn empty_inputs_give_empty_table() {
        assert!(align_series(&ComparisonResult::default(), 0.06).is_empty());

        let result: ComparisonResult = vec![("A".to_string(), analysis("A", &[]))]
            .into_iter()
            .collect();
        let table = align_series(&result, 0.06);
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["A"]);
    }
}
