use compass_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ServiceError {
    pub fn offer_not_found(id: impl Into<String>) -> Self {
        ServiceError::NotFound { kind: "Offer", id: id.into() }
    }

    pub fn code_not_found(code: impl Into<String>) -> Self {
        ServiceError::NotFound { kind: "Offer code", id: code.into() }
    }
}

impl From<compass_core::RepositoryError> for ServiceError {
    fn from(err: compass_core::RepositoryError) -> Self {
        ServiceError::Core(CoreError::RepositoryError(err.to_string()))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
