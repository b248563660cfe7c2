// src/services/client.rs
use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;

use crate::models::{ComparisonResult, FundIdentity};
use crate::services::parameters::ComparisonRequest;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Network(String),
    Status(u16),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
            FetchError::Status(code) => write!(f, "analysis service answered HTTP {}", code),
            FetchError::Decode(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Plan filter understood by the `/search` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SearchFilter {
    #[serde(rename = "Direct Growth")]
    DirectGrowth,
    #[serde(rename = "Regular")]
    Regular,
}

impl SearchFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchFilter::DirectGrowth => "Direct Growth",
            SearchFilter::Regular => "Regular",
        }
    }
}

/// The analysis backend, as seen from the dashboard.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn search_funds(
        &self,
        query: &str,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<FundIdentity>, FetchError>;

    async fn compare_funds(
        &self,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResult, FetchError>;
}

/// HTTP client for the analysis backend.
#[derive(Clone)]
pub struct AnalysisClient {
    base_url: String,
    client: Client,
}

impl AnalysisClient {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_API_URL)
    }

    pub fn with_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        AnalysisClient {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl Default for AnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    async fn search_funds(
        &self,
        query: &str,
        filter: Option<SearchFilter>,
    ) -> Result<Vec<FundIdentity>, FetchError> {
        let mut params = vec![("q", query.to_string())];
        if let Some(filter) = filter {
            params.push(("filter", filter.as_str().to_string()));
        }
        self.get_json("/search", &params).await
    }

    async fn compare_funds(
        &self,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResult, FetchError> {
        self.get_json("/compare", &request.query_pairs()).await
    }
}

/// Runs a comparison, turning any failure into `None`.
pub async fn fetch_comparison(
    api: &dyn AnalysisApi,
    request: &ComparisonRequest,
) -> Option<ComparisonResult> {
    info!(
        "Requesting comparison for {:?} over {} years against {}",
        request.codes, request.years, request.benchmark_rate
    );
    match api.compare_funds(request).await {
        Ok(result) => {
            info!("Comparison returned {} fund(s)", result.len());
            Some(result)
        }
        Err(e) => {
            error!("Comparison failed: {}", e);
            None
        }
    }
}

/// Runs a fund search, turning any failure into an empty list.
pub async fn search_or_empty(
    api: &dyn AnalysisApi,
    query: &str,
    filter: Option<SearchFilter>,
) -> Vec<FundIdentity> {
    match api.search_funds(query, filter).await {
        Ok(funds) => funds,
        Err(e) => {
            warn!("Fund search for {:?} failed: {}", query, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingApi;

    #[async_trait]
    impl AnalysisApi for FailingApi {
        async fn search_funds(
            &self,
            _query: &str,
            _filter: Option<SearchFilter>,
        ) -> Result<Vec<FundIdentity>, FetchError> {
            Err(FetchError::Network("connection refused".to_string()))
        }

        async fn compare_funds(
            &self,
            _request: &ComparisonRequest,
        ) -> Result<ComparisonResult, FetchError> {
            Err(FetchError::Status(500))
        }
    }

    #[test]
    fn base_url_is_normalized() {
        let client = AnalysisClient::with_url("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(AnalysisClient::new().base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn fetch_error_messages() {
        assert_eq!(
            FetchError::Status(404).to_string(),
            "analysis service answered HTTP 404"
        );
        assert!(FetchError::Decode("eof".into()).to_string().contains("eof"));
    }

    #[test]
    fn search_filter_wire_names() {
        assert_eq!(SearchFilter::DirectGrowth.as_str(), "Direct Growth");
        let parsed: SearchFilter = serde_json::from_str("\"Regular\"").unwrap();
        assert_eq!(parsed, SearchFilter::Regular);
    }

    #[tokio::test]
    async fn failures_are_absorbed() {
        let request = ComparisonRequest {
            codes: vec!["122639".to_string()],
            years: 3.0,
            benchmark_rate: 0.06,
        };
        assert!(fetch_comparison(&FailingApi, &request).await.is_none());
        assert!(search_or_empty(&FailingApi, "quant", None).await.is_empty());
    }
}
