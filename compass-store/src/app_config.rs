use compass_offer::{EngineConfig, ExpiryManager, MatchPolicy, OfferAnalyzer, RankingOptions};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub ranking: RankingOptions,
    #[serde(default)]
    pub matching: MatchPolicy,
    #[serde(default)]
    pub offers: OfferRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OfferRules {
    #[serde(default = "default_expiring_soon_days")]
    pub expiring_soon_days: i64,
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: i64,
}

fn default_expiring_soon_days() -> i64 { 7 }
fn default_upcoming_window_days() -> i64 { 90 }

impl Default for OfferRules {
    fn default() -> Self {
        Self {
            expiring_soon_days: default_expiring_soon_days(),
            upcoming_window_days: default_upcoming_window_days(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `COMPASS__RANKING__LIMIT=5` sets `ranking.limit`
            .add_source(config::Environment::with_prefix("COMPASS").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            ranking: self.ranking,
            matching: self.matching,
        }
    }

    pub fn expiry_manager(&self) -> ExpiryManager {
        ExpiryManager::new(self.offers.expiring_soon_days)
    }

    pub fn offer_analyzer(&self) -> OfferAnalyzer {
        OfferAnalyzer::new(self.expiry_manager(), self.offers.upcoming_window_days)
    }
}
