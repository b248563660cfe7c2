// src/handlers/dashboard.rs
use log::{info, warn};
use serde::Deserialize;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{FundIdentity, RESERVED_ROW_KEYS};
use crate::services::dashboard::Dashboard;
use crate::services::parameters::{benchmark_in_domain, years_in_domain, BENCHMARK_RANGE, YEARS_RANGE};

#[derive(Debug, Deserialize)]
pub struct ParametersUpdate {
    pub years: Option<f64>,
    pub benchmark_rate: Option<f64>,
}

pub async fn get_dashboard(dashboard: Dashboard) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&dashboard.view()))
}

pub async fn add_fund(fund: FundIdentity, dashboard: Dashboard) -> Result<Json, Rejection> {
    if fund.code.trim().is_empty() {
        warn!("Rejected fund with empty code");
        return Err(warp::reject::custom(ApiError::bad_request("Fund code must not be empty")));
    }
    if RESERVED_ROW_KEYS.contains(&fund.code.as_str()) {
        warn!("Rejected fund with reserved code {}", fund.code);
        return Err(warp::reject::custom(ApiError::bad_request(format!(
            "Fund code {:?} is reserved",
            fund.code
        ))));
    }
    if !dashboard.add_fund(fund.clone()) {
        info!("Fund {} already selected", fund.code);
    }
    Ok(warp::reply::json(&dashboard.view()))
}

pub async fn remove_fund(code: String, dashboard: Dashboard) -> Result<Json, Rejection> {
    if !dashboard.remove_fund(&code) {
        info!("Fund {} was not selected", code);
    }
    Ok(warp::reply::json(&dashboard.view()))
}

pub async fn update_parameters(
    update: ParametersUpdate,
    dashboard: Dashboard,
) -> Result<Json, Rejection> {
    if let Some(years) = update.years {
        if !years_in_domain(years) {
            return Err(warp::reject::custom(ApiError::bad_request(format!(
                "years must be between {} and {}",
                YEARS_RANGE.0, YEARS_RANGE.1
            ))));
        }
    }
    if let Some(rate) = update.benchmark_rate {
        if !benchmark_in_domain(rate) {
            return Err(warp::reject::custom(ApiError::bad_request(format!(
                "benchmark_rate must be between {} and {}",
                BENCHMARK_RANGE.0, BENCHMARK_RANGE.1
            ))));
        }
    }

    if let Some(years) = update.years {
        dashboard.set_years(years);
    }
    if let Some(rate) = update.benchmark_rate {
        dashboard.set_benchmark_rate(rate);
    }
    Ok(warp::reply::json(&dashboard.view()))
}

pub async fn run_comparison(dashboard: Dashboard) -> Result<Json, Rejection> {
    info!("Manual comparison requested");
    dashboard.run_now();
    Ok(warp::reply::json(&dashboard.view()))
}
