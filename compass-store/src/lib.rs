pub mod app_config;
pub mod memory_repo;

pub use app_config::Config;
pub use memory_repo::InMemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] compass_core::CoreError),
}
