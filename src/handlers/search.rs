// src/handlers/search.rs
use serde::Deserialize;
use warp::reply::Json;
use warp::Rejection;

use crate::services::client::SearchFilter;
use crate::services::search::FundSearch;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub filter: Option<SearchFilter>,
}

pub async fn set_query(body: SearchQuery, search: FundSearch) -> Result<Json, Rejection> {
    search.set_query(&body.query, body.filter);
    Ok(warp::reply::json(&search.snapshot()))
}

pub async fn get_results(search: FundSearch) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&search.snapshot()))
}
