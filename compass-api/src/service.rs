use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use compass_core::{CruiseRepository, OfferRepository, Snapshot};
use compass_offer::audit::{self, CodeValidationReport};
use compass_offer::{
    CasinoOffer, EngineConfig, ExpiryManager, OfferAnalysis, OfferAnalyzer, OfferDetail,
    OfferDetailComposer, OfferRankings, RankingAggregator, ResolvedValuation,
};
use compass_store::{Config, InMemoryStore};
use tracing::{debug, warn};

use crate::error::ServiceResult;

/// Query boundary over the offer and cruise stores.
///
/// Every call re-reads both stores and recomputes from scratch; nothing is
/// cached between calls.
pub struct CompService {
    offers: Arc<dyn OfferRepository>,
    cruises: Arc<dyn CruiseRepository>,
    aggregator: RankingAggregator,
    expiry: ExpiryManager,
    analyzer: OfferAnalyzer,
}

impl CompService {
    pub fn new(
        offers: Arc<dyn OfferRepository>,
        cruises: Arc<dyn CruiseRepository>,
        engine: EngineConfig,
    ) -> Self {
        Self {
            offers,
            cruises,
            aggregator: engine.aggregator(),
            expiry: ExpiryManager::default(),
            analyzer: OfferAnalyzer::default(),
        }
    }

    pub fn with_offer_rules(mut self, expiry: ExpiryManager, analyzer: OfferAnalyzer) -> Self {
        self.expiry = expiry;
        self.analyzer = analyzer;
        self
    }

    /// Service over a single in-memory store, tuned by `config`
    pub fn from_config(store: Arc<InMemoryStore>, config: &Config) -> Self {
        Self::new(store.clone(), store, config.engine())
            .with_offer_rules(config.expiry_manager(), config.offer_analyzer())
    }

    async fn snapshot(&self) -> ServiceResult<Snapshot> {
        Ok(Snapshot::load(self.offers.as_ref(), self.cruises.as_ref()).await?)
    }

    /// Value one offer, optionally against one cruise. `None` when the
    /// offer id is unknown. An unknown cruise id values the offer alone.
    pub async fn value_for_pair(
        &self,
        offer_id: &str,
        cruise_id: Option<&str>,
    ) -> ServiceResult<Option<ResolvedValuation>> {
        let Some(offer) = self.offers.get_offer(offer_id).await? else {
            debug!(offer_id, "offer not found");
            return Ok(None);
        };

        let cruise = match cruise_id {
            Some(id) => {
                let cruise = self.cruises.get_cruise(id).await?;
                if cruise.is_none() {
                    warn!(cruise_id = id, offer_id, "cruise not found, valuing offer alone");
                }
                cruise
            }
            None => None,
        };

        Ok(Some(self.aggregator.resolver().resolve(&offer, cruise.as_ref())))
    }

    pub async fn rankings(&self, generated_at: DateTime<Utc>) -> ServiceResult<OfferRankings> {
        let snapshot = self.snapshot().await?;
        Ok(self.aggregator.rank(&snapshot.offers, &snapshot.cruises, generated_at))
    }

    pub async fn offer_detail(
        &self,
        offer_code: &str,
        generated_at: DateTime<Utc>,
    ) -> ServiceResult<Option<OfferDetail>> {
        let snapshot = self.snapshot().await?;
        Ok(OfferDetailComposer::new(&self.aggregator).compose(
            offer_code,
            &snapshot.offers,
            &snapshot.cruises,
            generated_at,
        ))
    }

    pub async fn list_active_offers(&self, today: NaiveDate) -> ServiceResult<Vec<CasinoOffer>> {
        let offers = self.offers.list_offers().await?;
        let active: Vec<CasinoOffer> = self.expiry.active_offers(&offers, today).into_iter().cloned().collect();
        debug!(total = offers.len(), active = active.len(), "active offers listed");
        Ok(active)
    }

    pub async fn validate_offer_codes(&self) -> ServiceResult<CodeValidationReport> {
        let offers = self.offers.list_offers().await?;
        Ok(audit::validate_offer_codes(&offers))
    }

    pub async fn linked_cruise_counts(&self) -> ServiceResult<BTreeMap<String, usize>> {
        let cruises = self.cruises.list_cruises().await?;
        Ok(audit::linked_cruise_counts(&cruises))
    }

    pub async fn offer_analysis(&self, today: NaiveDate) -> ServiceResult<Vec<OfferAnalysis>> {
        let snapshot = self.snapshot().await?;
        Ok(self.analyzer.analyze(&snapshot.offers, &snapshot.cruises, today))
    }
}
