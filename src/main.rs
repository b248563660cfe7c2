use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use fund_dashboard::config::Config;
use fund_dashboard::routes;
use fund_dashboard::{AnalysisApi, AnalysisClient, Dashboard, FundIdentity, FundSearch};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = Config::from_env()?;
    info!("Using analysis service at {}", config.api_url);

    let api: Arc<dyn AnalysisApi> = Arc::new(AnalysisClient::with_url(config.api_url.clone()));
    let dashboard = Dashboard::with_debounce(api.clone(), config.compare_debounce);
    let search = FundSearch::with_debounce(api, config.search_debounce);

    if config.seed_default_fund {
        let seed = FundIdentity::default_seed();
        info!("Seeding selection with {} ({})", seed.name, seed.code);
        dashboard.add_fund(seed);
    }

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    let api = routes::routes(dashboard, search).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
