use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment};
use serde::Deserialize;

const DEFAULT_INDEX_URL: &str = "http://ufcstats.com/statistics/fighters";
const DEFAULT_DETAIL_PREFIX: &str = "http://ufcstats.com/fighter-details/";
const DEFAULT_USER_AGENT: &str = "ufc_stats/0.1 (+fighter stats collector)";

/// Runtime settings. Defaults can be overridden with `UFC_*` env vars,
/// e.g. `UFC_DETAIL_DELAY_MS=3000`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub index_url: String,
    pub detail_prefix: String,
    pub index_delay_ms: u64,
    pub detail_delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub raw_path: PathBuf,
    pub clean_path: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self> {
        defaults()?
            .add_source(Environment::with_prefix("UFC").try_parsing(true))
            .build()?
            .try_deserialize()
            .context("Invalid UFC_* settings")
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("index_url", DEFAULT_INDEX_URL)?
        .set_default("detail_prefix", DEFAULT_DETAIL_PREFIX)?
        .set_default("index_delay_ms", 1000_i64)?
        .set_default("detail_delay_ms", 2000_i64)?
        .set_default("timeout_secs", 30_i64)?
        .set_default("user_agent", DEFAULT_USER_AGENT)?
        .set_default("raw_path", "data/fighters_raw.csv")?
        .set_default("clean_path", "data/fighters_clean.csv")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize() {
        let s: Settings = defaults().unwrap().build().unwrap().try_deserialize().unwrap();
        assert_eq!(s.index_url, DEFAULT_INDEX_URL);
        assert_eq!(s.index_delay_ms, 1000);
        assert_eq!(s.detail_delay_ms, 2000);
        assert_eq!(s.raw_path, PathBuf::from("data/fighters_raw.csv"));
    }
}
