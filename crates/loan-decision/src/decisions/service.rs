use std::sync::Arc;

use tracing::warn;

use super::builder::{build_request, BuildError, DecisionSubmission};
use super::domain::{DecisionRequest, RequestId};
use super::processor::{ProcessError, Processor};
use super::reports::sources::{ApplicantDataSource, PropertyDataSource};
use super::repository::{DecisionRepository, RepositoryError};
use super::review::{review, RuleReview};

/// Service composing the request builder, processor, and repository.
pub struct DecisionService<A, P, S> {
    processor: Processor<A, P, S>,
    repository: Arc<S>,
}

impl<A, P, S> DecisionService<A, P, S>
where
    A: ApplicantDataSource + 'static,
    P: PropertyDataSource + 'static,
    S: DecisionRepository + 'static,
{
    pub fn new(processor: Processor<A, P, S>, repository: Arc<S>) -> Self {
        Self {
            processor,
            repository,
        }
    }

    /// Build a request from the submission and run every rule over it.
    pub fn submit(
        &self,
        submission: DecisionSubmission,
    ) -> Result<DecisionRequest, DecisionServiceError> {
        let request = build_request(submission).map_err(|err| {
            warn!(error = %err, "decision submission rejected");
            err
        })?;
        Ok(self.processor.process(request)?)
    }

    pub fn get(&self, id: RequestId) -> Result<DecisionRequest, DecisionServiceError> {
        let request = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(request)
    }

    pub fn review(&self, id: RequestId) -> Result<Vec<RuleReview>, DecisionServiceError> {
        let request = self.get(id)?;
        Ok(review(&request, self.processor.rule_book()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecisionServiceError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
