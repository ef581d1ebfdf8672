// config.rs
use std::env;
use std::path::PathBuf;

use crate::services::SearchLimits;

/// Default partial credit for a highlights-only game under soft coverage.
pub const DEFAULT_HIGHLIGHTS_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub highlights_weight: f64,
    pub search_limits: SearchLimits,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = SearchLimits::default();

        AppConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .expect("PORT must be a number"),
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            highlights_weight: read_highlights_weight(),
            search_limits: SearchLimits {
                max_results: parse_or("SEARCH_MAX_RESULTS", defaults.max_results),
                max_combination_size: parse_or(
                    "SEARCH_MAX_COMBINATION_SIZE",
                    defaults.max_combination_size,
                ),
                max_nodes: parse_or("SEARCH_MAX_NODES", defaults.max_nodes),
            },
        }
    }
}

/// The weight must lie strictly between 0 and 1; anything else falls back
/// to the default with a warning.
fn read_highlights_weight() -> f64 {
    let Ok(raw) = env::var("HIGHLIGHTS_WEIGHT") else {
        return DEFAULT_HIGHLIGHTS_WEIGHT;
    };
    match raw.parse::<f64>() {
        Ok(weight) if weight > 0.0 && weight < 1.0 => weight,
        _ => {
            tracing::warn!(
                "HIGHLIGHTS_WEIGHT '{}' is not in (0, 1), using {}",
                raw,
                DEFAULT_HIGHLIGHTS_WEIGHT
            );
            DEFAULT_HIGHLIGHTS_WEIGHT
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
