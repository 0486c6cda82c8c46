use serde::{Deserialize, Serialize};
use compass_catalog::Cruise;
use compass_offer::CasinoOffer;
use crate::repository::{CruiseRepository, OfferRepository};
use crate::{CoreError, CoreResult};

/// Offer and cruise records read together for one computation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub offers: Vec<CasinoOffer>,
    pub cruises: Vec<Cruise>,
}

impl Snapshot {
    pub fn new(offers: Vec<CasinoOffer>, cruises: Vec<Cruise>) -> Self {
        Self { offers, cruises }
    }

    /// Parse a `{ "offers": [...], "cruises": [...] }` document
    pub fn from_json(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text).map_err(|e| CoreError::InvalidSnapshot(e.to_string()))
    }

    /// Read the full record set from both repositories
    pub async fn load(
        offers: &dyn OfferRepository,
        cruises: &dyn CruiseRepository,
    ) -> CoreResult<Self> {
        let offers = offers
            .list_offers()
            .await
            .map_err(|e| CoreError::RepositoryError(e.to_string()))?;
        let cruises = cruises
            .list_cruises()
            .await
            .map_err(|e| CoreError::RepositoryError(e.to_string()))?;

        tracing::debug!(offers = offers.len(), cruises = cruises.len(), "snapshot loaded");
        Ok(Self { offers, cruises })
    }
}
