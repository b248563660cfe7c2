// src/lib.rs

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use models::{AlignedRow, ComparisonResult, FundAnalysis, FundIdentity};
pub use services::client::{AnalysisApi, AnalysisClient, FetchError, SearchFilter};
pub use services::dashboard::Dashboard;
pub use services::presentation::DashboardView;
pub use services::search::FundSearch;
