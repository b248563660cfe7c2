// src/bin/check_backend.rs
use dotenv::dotenv;
use fund_dashboard::config::Config;
use fund_dashboard::models::DEFAULT_FUND_CODE;
use fund_dashboard::services::aligner::align_series;
use fund_dashboard::services::client::{fetch_comparison, search_or_empty};
use fund_dashboard::services::parameters::{ComparisonParameters, ComparisonRequest};
use fund_dashboard::{AnalysisClient, SearchFilter};
use log::{error, info};
use std::env;

/// Usage: check_backend [search words] ; compares the first hit with the
/// default fund and prints the aligned table.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let client = AnalysisClient::with_url(config.api_url.clone());
    info!("Checking analysis service at {}", client.base_url());

    let query = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let query = if query.is_empty() { "Quant Small".to_string() } else { query };

    let hits = search_or_empty(&client, &query, Some(SearchFilter::DirectGrowth)).await;
    info!("Search {:?} returned {} fund(s)", query, hits.len());
    for fund in hits.iter().take(3) {
        println!("[{}] {}", fund.code, fund.name);
    }

    let mut codes = vec![DEFAULT_FUND_CODE.to_string()];
    if let Some(first) = hits.first() {
        if first.code != DEFAULT_FUND_CODE {
            codes.insert(0, first.code.clone());
        }
    }

    let params = ComparisonParameters::default();
    let request = ComparisonRequest::new(codes, params);
    let result = match fetch_comparison(&client, &request).await {
        Some(result) => result,
        None => {
            error!("Comparison failed for {:?}", request.codes);
            return Err("comparison failed".into());
        }
    };

    for (code, fund) in &result.funds {
        println!("\nFUND: {} [{}]", fund.name, code);
        println!("  Mean Return: {:.2}%", fund.metrics.mean * 100.0);
        println!("  Volatility:  {:.2}%", fund.metrics.std_dev * 100.0);
        println!("  Prob > {:.1}%: {:.0}%", params.benchmark_rate * 100.0, fund.probabilities.beat_benchmark * 100.0);
        println!("  Prob > 12%:  {:.0}%", fund.probabilities.beat_12pct * 100.0);
        println!("  Prob Loss:   {:.0}%", fund.probabilities.negative * 100.0);
    }

    let table = align_series(&result, params.benchmark_rate);
    println!("\n{} aligned rows", table.rows.len());
    for row in table.rows.iter().rev().take(5).rev() {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|code| match row.value(code) {
                Some(v) => format!("{:>8.2}%", v * 100.0),
                None => format!("{:>9}", "-"),
            })
            .collect();
        println!("{}  {}", row.date, cells.join(" "));
    }

    Ok(())
}
