use async_trait::async_trait;
use compass_catalog::Cruise;
use compass_offer::CasinoOffer;

pub type RepositoryError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only access to casino offer records
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn get_offer(
        &self,
        id: &str,
    ) -> Result<Option<CasinoOffer>, RepositoryError>;

    async fn list_offers(&self) -> Result<Vec<CasinoOffer>, RepositoryError>;
}

/// Read-only access to cruise records
#[async_trait]
pub trait CruiseRepository: Send + Sync {
    async fn get_cruise(
        &self,
        id: &str,
    ) -> Result<Option<Cruise>, RepositoryError>;

    async fn list_cruises(&self) -> Result<Vec<Cruise>, RepositoryError>;
}
