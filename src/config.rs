// src/config.rs
use anyhow::{Context, Result};
use log::warn;
use std::env;
use std::time::Duration;

use crate::services::client::DEFAULT_API_URL;
use crate::services::dashboard::DEFAULT_COMPARE_DEBOUNCE;
use crate::services::search::DEFAULT_SEARCH_DEBOUNCE;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub port: u16,
    pub compare_debounce: Duration,
    pub search_debounce: Duration,
    pub seed_default_fund: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            port: 3030,
            compare_debounce: DEFAULT_COMPARE_DEBOUNCE,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            seed_default_fund: true,
        }
    }
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_url = lookup("ANALYSIS_API_URL").unwrap_or_else(|| {
            warn!("$ANALYSIS_API_URL not set, defaulting to {}", defaults.api_url);
            defaults.api_url.clone()
        });

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got {:?}", raw))?,
            None => {
                warn!("$PORT not set, defaulting to {}", defaults.port);
                defaults.port
            }
        };

        let compare_debounce = match lookup("COMPARE_DEBOUNCE_MS") {
            Some(raw) => parse_millis("COMPARE_DEBOUNCE_MS", &raw)?,
            None => defaults.compare_debounce,
        };

        let search_debounce = match lookup("SEARCH_DEBOUNCE_MS") {
            Some(raw) => parse_millis("SEARCH_DEBOUNCE_MS", &raw)?,
            None => defaults.search_debounce,
        };

        let seed_default_fund = match lookup("SEED_DEFAULT_FUND") {
            Some(raw) => parse_flag("SEED_DEFAULT_FUND", &raw)?,
            None => defaults.seed_default_fund,
        };

        Ok(Config {
            api_url,
            port,
            compare_debounce,
            search_debounce,
            seed_default_fund,
        })
    }
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration> {
    let ms = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{} must be a number of milliseconds, got {:?}", key, raw))?;
    Ok(Duration::from_millis(ms))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be true or false, got {:?}", key, other),
    }
}
