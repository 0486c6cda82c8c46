pub mod models;
pub mod rules;
pub mod valuation;
pub mod matcher;
pub mod ranker;
pub mod detail;
pub mod expiry;
pub mod audit;

use serde::{Deserialize, Serialize};

pub use models::{CasinoOffer, ResolvedValuation, ValueMethod};
pub use rules::CompedShareEstimator;
pub use valuation::{ValueResolver, ValuationStep};
pub use matcher::{MatchPolicy, OfferMatcher};
pub use ranker::{OfferRankings, RankingAggregator, RankingEntry, RankingOptions, ValuedSailing};
pub use detail::{OfferDetail, OfferDetailComposer, RankPosition};
pub use expiry::{ExpiryManager, OfferStatus};
pub use audit::{OfferAnalysis, OfferAnalyzer};

/// Tunables for the valuation and ranking engine
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ranking: RankingOptions,
    pub matching: MatchPolicy,
}

impl EngineConfig {
    /// Aggregator wired with the default resolver and this configuration
    pub fn aggregator(&self) -> RankingAggregator {
        RankingAggregator::new(ValueResolver::default(), OfferMatcher::new(self.matching), self.ranking)
    }
}
