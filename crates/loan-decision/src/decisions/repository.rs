use super::domain::{DecisionRequest, RequestId};

/// Storage abstraction for evaluated requests.
///
/// `save` receives the whole request (applicant, address, reports, decisions) and either
/// stores all of it or returns an error; it assigns an id when the request has none.
pub trait DecisionRepository: Send + Sync {
    fn save(&self, request: DecisionRequest) -> Result<DecisionRequest, RepositoryError>;
    fn fetch(&self, id: RequestId) -> Result<Option<DecisionRequest>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
