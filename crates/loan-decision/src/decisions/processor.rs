use std::sync::Arc;

use tracing::{error, info};

use super::domain::DecisionRequest;
use super::reports::sources::{ApplicantDataSource, PropertyDataSource};
use super::reports::ReportOrchestrator;
use super::repository::{DecisionRepository, RepositoryError};
use super::rules::{rule_for, run_rule, RuleBook, RuleError, RULE_SET};

/// Runs the fixed rule set over a request and persists the result.
///
/// The processor does no evaluation of its own. A [`RuleError`] aborts the request before
/// anything is saved.
pub struct Processor<A, P, S> {
    reports: ReportOrchestrator<A, P>,
    rules: Arc<RuleBook>,
    repository: Arc<S>,
}

impl<A, P, S> Processor<A, P, S>
where
    A: ApplicantDataSource,
    P: PropertyDataSource,
    S: DecisionRepository,
{
    pub fn new(reports: ReportOrchestrator<A, P>, rules: Arc<RuleBook>, repository: Arc<S>) -> Self {
        Self {
            reports,
            rules,
            repository,
        }
    }

    pub fn rule_book(&self) -> &RuleBook {
        &self.rules
    }

    pub fn process(&self, mut request: DecisionRequest) -> Result<DecisionRequest, ProcessError> {
        for name in RULE_SET {
            if let Err(err) = run_rule(rule_for(name), &mut request, &self.rules, &self.reports) {
                error!(
                    request = %request.log_label(),
                    rule = %name,
                    error = %err,
                    "rule evaluation aborted the request"
                );
                return Err(err.into());
            }
        }

        request.refresh_final_status();
        let saved = self.repository.save(request)?;
        info!(
            request = %saved.log_label(),
            application_id = saved.application_id,
            decisions = saved.decisions().len(),
            final_status = saved.final_status().label(),
            "decision request processed"
        );
        Ok(saved)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
