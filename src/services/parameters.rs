// src/services/parameters.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_YEARS: f64 = 3.0;
pub const DEFAULT_BENCHMARK_RATE: f64 = 0.06;

/// Horizons offered as quick picks.
pub const PRESET_YEARS: [f64; 3] = [1.0, 3.0, 5.0];
/// Slider range for the horizon, in whole years.
pub const YEARS_RANGE: (f64, f64) = (1.0, 10.0);
pub const BENCHMARK_RANGE: (f64, f64) = (0.01, 0.15);
pub const BENCHMARK_STEP: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonParameters {
    pub years: f64,
    pub benchmark_rate: f64,
}

impl Default for ComparisonParameters {
    fn default() -> Self {
        ComparisonParameters {
            years: DEFAULT_YEARS,
            benchmark_rate: DEFAULT_BENCHMARK_RATE,
        }
    }
}

impl ComparisonParameters {
    /// Returns whether the value changed.
    pub fn set_years(&mut self, years: f64) -> bool {
        if self.years == years {
            return false;
        }
        self.years = years;
        true
    }

    /// Returns whether the value changed.
    pub fn set_benchmark_rate(&mut self, rate: f64) -> bool {
        if self.benchmark_rate == rate {
            return false;
        }
        self.benchmark_rate = rate;
        true
    }
}

pub fn years_in_domain(years: f64) -> bool {
    years.is_finite() && years >= YEARS_RANGE.0 && years <= YEARS_RANGE.1
}

pub fn benchmark_in_domain(rate: f64) -> bool {
    rate.is_finite() && rate >= BENCHMARK_RANGE.0 && rate <= BENCHMARK_RANGE.1
}

/// What a comparison is asked for. Derived from the selection and the
/// parameters at issue time, never stored as user state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRequest {
    pub codes: Vec<String>,
    pub years: f64,
    pub benchmark_rate: f64,
}

impl ComparisonRequest {
    pub fn new(codes: Vec<String>, params: ComparisonParameters) -> Self {
        ComparisonRequest {
            codes,
            years: params.years,
            benchmark_rate: params.benchmark_rate,
        }
    }

    /// Same funds (in any order) and same scalars.
    pub fn is_equivalent(&self, other: &ComparisonRequest) -> bool {
        if self.years != other.years || self.benchmark_rate != other.benchmark_rate {
            return false;
        }
        let mine: HashSet<&str> = self.codes.iter().map(String::as_str).collect();
        let theirs: HashSet<&str> = other.codes.iter().map(String::as_str).collect();
        mine == theirs
    }

    /// Query pairs for `GET /compare`; `codes` repeats once per fund.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> =
            self.codes.iter().map(|c| ("codes", c.clone())).collect();
        pairs.push(("years", self.years.to_string()));
        pairs.push(("benchmark", self.benchmark_rate.to_string()));
        pairs
    }
}
