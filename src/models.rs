// src/models.rs
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A fund as the user sees it. Two identities are the same fund when their
/// codes match; the name is only for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundIdentity {
    pub code: String,
    pub name: String,
}

pub const DEFAULT_FUND_CODE: &str = "122639";
pub const DEFAULT_FUND_NAME: &str = "Parag Parikh Flexi Cap Fund - Direct Growth";

impl FundIdentity {
    /// The fund a fresh session starts with.
    pub fn default_seed() -> Self {
        FundIdentity::new(DEFAULT_FUND_CODE, DEFAULT_FUND_NAME)
    }

    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        FundIdentity {
            code: code.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for FundIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for FundIdentity {}

impl Hash for FundIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundMetrics {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundProbabilities {
    pub negative: f64,
    pub beat_benchmark: f64,
    pub beat_12pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub rolling_return: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav: Option<f64>,
}

/// Per-fund payload of the `/compare` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundAnalysis {
    pub name: String,
    pub metrics: FundMetrics,
    pub probabilities: FundProbabilities,
    pub series_data: Vec<SeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark_used: Option<f64>,
}

/// Fund code -> analysis, in the order the funds were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonResult {
    pub funds: IndexMap<String, FundAnalysis>,
}

impl ComparisonResult {
    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn get(&self, code: &str) -> Option<&FundAnalysis> {
        self.funds.get(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.funds.keys().map(String::as_str)
    }

    /// Keeps only the funds named in `codes`, in that order.
    pub fn restricted_to(mut self, codes: &[String]) -> Self {
        let mut funds = IndexMap::with_capacity(codes.len());
        for code in codes {
            if let Some(analysis) = self.funds.shift_remove(code) {
                funds.insert(code.clone(), analysis);
            }
        }
        ComparisonResult { funds }
    }

    /// Puts the funds named in `codes` first, in that order, followed by any
    /// others in their current order.
    pub fn arranged_by(&self, codes: &[String]) -> Self {
        let mut funds = IndexMap::with_capacity(self.funds.len());
        for code in codes {
            if let Some(analysis) = self.funds.get(code) {
                funds.insert(code.clone(), analysis.clone());
            }
        }
        for (code, analysis) in &self.funds {
            if !funds.contains_key(code) {
                funds.insert(code.clone(), analysis.clone());
            }
        }
        ComparisonResult { funds }
    }
}

impl FromIterator<(String, FundAnalysis)> for ComparisonResult {
    fn from_iter<I: IntoIterator<Item = (String, FundAnalysis)>>(iter: I) -> Self {
        ComparisonResult {
            funds: iter.into_iter().collect(),
        }
    }
}

/// Keys every aligned row carries next to the fund columns. A fund code may
/// not collide with these.
pub const RESERVED_ROW_KEYS: [&str; 2] = ["date", "benchmark"];

/// One date of the chart table. Funds without an observation on `date` have
/// no entry in `values`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub benchmark: f64,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

impl AlignedRow {
    pub fn new(date: NaiveDate, benchmark: f64) -> Self {
        AlignedRow {
            date,
            benchmark,
            values: IndexMap::new(),
        }
    }

    pub fn value(&self, code: &str) -> Option<f64> {
        self.values.get(code).copied()
    }
}
