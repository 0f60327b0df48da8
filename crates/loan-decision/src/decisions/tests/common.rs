use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::{json, Value};

use crate::decisions::domain::{Address, Applicant, DecisionRequest, RequestId};
use crate::decisions::processor::Processor;
use crate::decisions::reports::sources::{
    normalize_street, ApplicantDataSource, DataSourceError, PropertyDataSource, RawFields,
};
use crate::decisions::reports::ReportOrchestrator;
use crate::decisions::repository::{DecisionRepository, RepositoryError};
use crate::decisions::rules::{RuleBook, RuleDocument};
use crate::decisions::service::DecisionService;

pub(super) const SSN: &str = "123456789";
pub(super) const STREET: &str = "212 encounter bay";

pub(super) const MORTGAGE_RULES: &str = r#"
California:
  enabled: true
  mortgage_threshold: 3
  counties:
    Alameda:
      enabled: true
      mortgage_threshold: 1
    Kern:
      enabled: false
Nevada:
  enabled: false
  mortgage_threshold: 5
"#;

pub(super) const CREDIT_RULES: &str = r#"
California:
  enabled: true
  credit_score_threshold: 600
  counties:
    Alameda:
      enabled: true
      credit_score_threshold: 650
Nevada:
  enabled: true
  credit_score_threshold: 500
"#;

pub(super) fn fields(value: Value) -> RawFields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object payload, got {other}"),
    }
}

pub(super) fn document(yaml: &str) -> RuleDocument {
    RuleDocument::from_yaml(yaml).expect("rule yaml parses")
}

pub(super) fn rule_book() -> RuleBook {
    RuleBook::new(document(MORTGAGE_RULES), document(CREDIT_RULES))
}

pub(super) fn request_in(state: &str, county: Option<&str>, income: f64) -> DecisionRequest {
    let applicant = Applicant {
        first_name: Some("john".to_string()),
        last_name: Some("doe".to_string()),
        ssn: Some(SSN.to_string()),
        income: Some(income),
        income_type: Some("salary".to_string()),
        requested_loan_amount: Some(20000.0),
        credit_reports: Vec::new(),
    };
    let address = Address {
        street: Some(STREET.to_string()),
        unit_number: Some("123".to_string()),
        city: Some("test_city".to_string()),
        zip: Some("321".to_string()),
        state: Some(state.to_string()),
        county: county.map(str::to_string),
        mortgage_reports: Vec::new(),
    };
    DecisionRequest::new(123, applicant, address)
}

pub(super) fn submission_json() -> Value {
    json!({
        "applicationId": 123,
        "firstName": "john",
        "lastName": "doe",
        "ssn": SSN,
        "income": 10000,
        "incomeType": "salary",
        "requestedLoanAmount": 20000,
        "address": {
            "street": STREET,
            "unitNumber": "123",
            "city": "test_city",
            "zip": "321",
            "state": "California",
            "county": "Alameda"
        }
    })
}

/// Applicant source that records every key it is asked for.
#[derive(Default)]
pub(super) struct RecordingApplicants {
    records: BTreeMap<String, RawFields>,
    failure: Option<DataSourceError>,
    calls: Mutex<Vec<String>>,
}

impl RecordingApplicants {
    pub(super) fn with_score(score: Value) -> Self {
        let mut records = BTreeMap::new();
        records.insert(SSN.to_string(), fields(json!({ "credit_score": score })));
        Self {
            records,
            ..Self::default()
        }
    }

    pub(super) fn failing(error: DataSourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl ApplicantDataSource for RecordingApplicants {
    fn lookup(&self, identity: &str) -> Result<RawFields, DataSourceError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(identity.to_string());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.records
            .get(identity)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound {
                key: identity.to_string(),
            })
    }
}

/// Property source keyed by normalized street that records raw lookups.
#[derive(Default)]
pub(super) struct RecordingProperties {
    records: BTreeMap<String, RawFields>,
    failure: Option<DataSourceError>,
    calls: Mutex<Vec<String>>,
}

impl RecordingProperties {
    pub(super) fn with_payload(payload: Value) -> Self {
        let mut records = BTreeMap::new();
        records.insert(normalize_street(STREET), fields(payload));
        Self {
            records,
            ..Self::default()
        }
    }

    pub(super) fn with_pending(pending: Value) -> Self {
        Self::with_payload(json!({
            "total_mortgage_amount": 250000,
            "pending_mortgage_amount": pending,
            "regular_in_payment": "yes"
        }))
    }

    pub(super) fn failing(error: DataSourceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl PropertyDataSource for RecordingProperties {
    fn lookup(&self, street: &str) -> Result<RawFields, DataSourceError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(street.to_string());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        let key = normalize_street(street);
        self.records
            .get(&key)
            .cloned()
            .ok_or(DataSourceError::NotFound { key })
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<HashMap<RequestId, DecisionRequest>>,
    sequence: AtomicU64,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl DecisionRepository for MemoryRepository {
    fn save(&self, mut request: DecisionRequest) -> Result<DecisionRequest, RepositoryError> {
        let id = match request.id {
            Some(id) => id,
            None => RequestId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1),
        };
        request.id = Some(id);
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .insert(id, request.clone());
        Ok(request)
    }

    fn fetch(&self, id: RequestId) -> Result<Option<DecisionRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl DecisionRepository for UnavailableRepository {
    fn save(&self, _request: DecisionRequest) -> Result<DecisionRequest, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: RequestId) -> Result<Option<DecisionRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type TestProcessor =
    Processor<RecordingApplicants, RecordingProperties, MemoryRepository>;

pub(super) struct Harness {
    pub(super) processor: TestProcessor,
    pub(super) applicants: Arc<RecordingApplicants>,
    pub(super) properties: Arc<RecordingProperties>,
    pub(super) repository: Arc<MemoryRepository>,
}

pub(super) fn harness(
    applicants: RecordingApplicants,
    properties: RecordingProperties,
    book: RuleBook,
) -> Harness {
    let applicants = Arc::new(applicants);
    let properties = Arc::new(properties);
    let repository = Arc::new(MemoryRepository::default());
    let orchestrator = ReportOrchestrator::new(applicants.clone(), properties.clone());
    let processor = Processor::new(orchestrator, Arc::new(book), repository.clone());
    Harness {
        processor,
        applicants,
        properties,
        repository,
    }
}

pub(super) fn orchestrator(
    applicants: RecordingApplicants,
    properties: RecordingProperties,
) -> ReportOrchestrator<RecordingApplicants, RecordingProperties> {
    ReportOrchestrator::new(Arc::new(applicants), Arc::new(properties))
}

pub(super) fn service(
    applicants: RecordingApplicants,
    properties: RecordingProperties,
) -> Arc<DecisionService<RecordingApplicants, RecordingProperties, MemoryRepository>> {
    let harness = harness(applicants, properties, rule_book());
    Arc::new(DecisionService::new(harness.processor, harness.repository))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
