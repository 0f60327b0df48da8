use loan_decision::config::AppConfig;
use loan_decision::decisions::{
    DecisionRepository, DecisionRequest, DecisionService, JsonApplicantSource,
    JsonPropertySource, Processor, ReportOrchestrator, RepositoryError, RequestId, RuleBook,
};
use loan_decision::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

pub(crate) type ApiDecisionService =
    DecisionService<JsonApplicantSource, JsonPropertySource, InMemoryDecisionRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store; ids are assigned sequentially from 1.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDecisionRepository {
    records: Arc<Mutex<HashMap<RequestId, DecisionRequest>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryDecisionRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<RequestId, DecisionRequest>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl DecisionRepository for InMemoryDecisionRepository {
    fn save(&self, mut request: DecisionRequest) -> Result<DecisionRequest, RepositoryError> {
        let id = match request.id {
            Some(id) => id,
            None => RequestId(self.sequence.fetch_add(1, Ordering::SeqCst) + 1),
        };
        request.id = Some(id);
        self.records()?.insert(id, request.clone());
        Ok(request)
    }

    fn fetch(&self, id: RequestId) -> Result<Option<DecisionRequest>, RepositoryError> {
        Ok(self.records()?.get(&id).cloned())
    }
}

/// Wire rule documents, data sources, and the repository from configuration.
///
/// A missing rule document only disables its rule; missing data files fail startup.
pub(crate) fn decision_service(config: &AppConfig) -> Result<Arc<ApiDecisionService>, AppError> {
    let rules = RuleBook::load(&config.rules);
    let applicants = JsonApplicantSource::from_path(&config.data_sources.applicant)?;
    let properties = JsonPropertySource::from_path(&config.data_sources.property)?;
    info!(
        applicants = applicants.len(),
        properties = properties.len(),
        "data sources loaded"
    );

    let repository = Arc::new(InMemoryDecisionRepository::default());
    let processor = Processor::new(
        ReportOrchestrator::new(Arc::new(applicants), Arc::new(properties)),
        Arc::new(rules),
        repository.clone(),
    );
    Ok(Arc::new(DecisionService::new(processor, repository)))
}
