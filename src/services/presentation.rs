// src/services/presentation.rs
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{ComparisonResult, FundIdentity, FundMetrics, FundProbabilities};
use crate::services::aligner::{align_series, AlignedTable};
use crate::services::parameters::ComparisonParameters;

/// Line colours, assigned by column position.
pub const SERIES_COLORS: [&str; 5] = [
    "hsl(221.2, 83.2%, 53.3%)",
    "hsl(12, 76%, 61%)",
    "hsl(173, 58%, 39%)",
    "hsl(197, 37%, 24%)",
    "hsl(43, 74%, 66%)",
];

pub const BENCHMARK_COLOR: &str = "#94a3b8";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub key: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundSummary {
    pub code: String,
    pub name: String,
    pub metrics: FundMetrics,
    pub probabilities: FundProbabilities,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Vec<FundIdentity>,
    pub parameters: ComparisonParameters,
    pub loading: bool,
    pub updated_at: Option<DateTime<Utc>>,
    pub table: AlignedTable,
    pub funds: IndexMap<String, FundSummary>,
    pub legend: Vec<SeriesStyle>,
}

impl DashboardView {
    /// No comparison to show: nothing run yet, the last one failed, or the
    /// selection is empty.
    pub fn is_empty_state(&self) -> bool {
        self.funds.is_empty()
    }
}

pub fn benchmark_label(rate: f64) -> String {
    format!("Benchmark {:.1}%", rate * 100.0)
}

pub(crate) fn build_view(
    selection: Vec<FundIdentity>,
    parameters: ComparisonParameters,
    loading: bool,
    updated_at: Option<DateTime<Utc>>,
    result: Option<&ComparisonResult>,
) -> DashboardView {
    let (table, funds, legend) = match result {
        Some(result) => {
            // Colours and columns follow the selection as it stands now, even
            // when the displayed result was fetched under an older order.
            let codes: Vec<String> = selection.iter().map(|f| f.code.clone()).collect();
            let result = &result.arranged_by(&codes);
            let table = align_series(result, parameters.benchmark_rate);
            let funds = result
                .funds
                .iter()
                .map(|(code, analysis)| {
                    let summary = FundSummary {
                        code: code.clone(),
                        name: analysis.name.clone(),
                        metrics: analysis.metrics.clone(),
                        probabilities: analysis.probabilities.clone(),
                    };
                    (code.clone(), summary)
                })
                .collect();
            let legend = legend_for(result, parameters.benchmark_rate);
            (table, funds, legend)
        }
        None => (AlignedTable::default(), IndexMap::new(), Vec::new()),
    };

    DashboardView {
        selection,
        parameters,
        loading,
        updated_at,
        table,
        funds,
        legend,
    }
}

fn legend_for(result: &ComparisonResult, benchmark_rate: f64) -> Vec<SeriesStyle> {
    let mut legend = vec![SeriesStyle {
        key: "benchmark".to_string(),
        label: benchmark_label(benchmark_rate),
        color: BENCHMARK_COLOR.to_string(),
    }];
    legend.extend(result.funds.iter().enumerate().map(|(i, (code, analysis))| SeriesStyle {
        key: code.clone(),
        label: analysis.name.clone(),
        color: SERIES_COLORS[i % SERIES_COLORS.len()].to_string(),
    }));
    legend
}
