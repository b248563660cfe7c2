// src/routes.rs
use log::info;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use warp::filters::body::BodyDeserializeError;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::dashboard::{
    add_fund, get_dashboard, remove_fund, run_comparison, update_parameters, ParametersUpdate,
};
use crate::handlers::error::ApiError;
use crate::handlers::search::{get_results, set_query, SearchQuery};
use crate::models::FundIdentity;
use crate::services::dashboard::Dashboard;
use crate::services::search::FundSearch;

const MAX_BODY_BYTES: u64 = 16 * 1024;

// Add recovery handling for our custom errors
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message: String;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(body_error) = err.find::<BodyDeserializeError>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = body_error.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

pub fn routes(
    dashboard: Dashboard,
    search: FundSearch,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let dashboard_filter = warp::any().map(move || dashboard.clone());
    let search_filter = warp::any().map(move || search.clone());

    let view_route = warp::path!("api" / "v1" / "dashboard")
        .and(warp::get())
        .and(dashboard_filter.clone())
        .and_then(get_dashboard);

    let add_fund_route = warp::path!("api" / "v1" / "funds")
        .and(warp::post())
        .and(json_body::<FundIdentity>())
        .and(dashboard_filter.clone())
        .and_then(add_fund);

    let remove_fund_route = warp::path!("api" / "v1" / "funds" / String)
        .and(warp::delete())
        .and(dashboard_filter.clone())
        .and_then(remove_fund);

    let parameters_route = warp::path!("api" / "v1" / "parameters")
        .and(warp::put())
        .and(json_body::<ParametersUpdate>())
        .and(dashboard_filter.clone())
        .and_then(update_parameters);

    let compare_route = warp::path!("api" / "v1" / "compare")
        .and(warp::post())
        .and(dashboard_filter.clone())
        .and_then(run_comparison);

    let search_query_route = warp::path!("api" / "v1" / "search")
        .and(warp::post())
        .and(json_body::<SearchQuery>())
        .and(search_filter.clone())
        .and_then(set_query);

    let search_results_route = warp::path!("api" / "v1" / "search")
        .and(warp::get())
        .and(search_filter.clone())
        .and_then(get_results);

    info!("All routes configured successfully.");

    view_route
        .or(add_fund_route)
        .or(remove_fund_route)
        .or(parameters_route)
        .or(compare_route)
        .or(search_query_route)
        .or(search_results_route)
        .recover(handle_rejection)
}
