pub mod repository;
pub mod snapshot;

pub use repository::{CruiseRepository, OfferRepository, RepositoryError};
pub use snapshot::Snapshot;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Repository access failed: {0}")]
    RepositoryError(String),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
