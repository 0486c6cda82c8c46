use async_trait::async_trait;
use compass_catalog::Cruise;
use compass_core::repository::{CruiseRepository, OfferRepository, RepositoryError};
use compass_core::Snapshot;
use compass_offer::CasinoOffer;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

use crate::StoreError;

/// Read-only store backed by a snapshot held in memory.
///
/// Records with a blank id are given a fresh v4 uuid on load so that
/// lookups by id stay unambiguous.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    offers: Vec<CasinoOffer>,
    cruises: Vec<Cruise>,
}

impl InMemoryStore {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let Snapshot { mut offers, mut cruises } = snapshot;

        let mut assigned = 0usize;
        for offer in offers.iter_mut().filter(|o| o.id.trim().is_empty()) {
            offer.id = Uuid::new_v4().to_string();
            assigned += 1;
        }
        for cruise in cruises.iter_mut().filter(|c| c.id.trim().is_empty()) {
            cruise.id = Uuid::new_v4().to_string();
            assigned += 1;
        }
        if assigned > 0 {
            warn!(assigned, "Assigned ids to snapshot records without one");
        }

        Self { offers, cruises }
    }

    pub fn from_snapshot_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let snapshot = Snapshot::from_json(&text)?;
        info!(
            path = %path.display(),
            offers = snapshot.offers.len(),
            cruises = snapshot.cruises.len(),
            "Snapshot loaded"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.offers.clone(), self.cruises.clone())
    }
}

#[async_trait]
impl OfferRepository for InMemoryStore {
    async fn get_offer(&self, id: &str) -> Result<Option<CasinoOffer>, RepositoryError> {
        Ok(self.offers.iter().find(|o| o.id == id).cloned())
    }

    async fn list_offers(&self) -> Result<Vec<CasinoOffer>, RepositoryError> {
        Ok(self.offers.clone())
    }
}

#[async_trait]
impl CruiseRepository for InMemoryStore {
    async fn get_cruise(&self, id: &str) -> Result<Option<Cruise>, RepositoryError> {
        Ok(self.cruises.iter().find(|c| c.id == id).cloned())
    }

    async fn list_cruises(&self) -> Result<Vec<Cruise>, RepositoryError> {
        Ok(self.cruises.clone())
    }
}
