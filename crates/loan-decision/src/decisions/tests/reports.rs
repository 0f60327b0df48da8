use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::decisions::domain::{CreditReport, MortgageReport};
use crate::decisions::reports::sources::DataSourceError;
use crate::decisions::reports::{Report, ReportKind, ReportLookup, ReportOrchestrator};

#[test]
fn found_credit_report_is_attached_to_the_applicant() {
    let orchestrator = orchestrator(
        RecordingApplicants::with_score(json!("712")),
        RecordingProperties::default(),
    );
    let mut request = request_in("California", None, 10000.0);

    let lookup = orchestrator.fetch_credit(&mut request);

    let expected = CreditReport {
        credit_score: Some(712),
    };
    assert_eq!(lookup, ReportLookup::Found(expected));
    let applicant = request.primary_applicant().expect("applicant");
    assert_eq!(applicant.credit_reports, vec![expected]);
}

#[test]
fn repeated_fetches_append_and_the_first_report_stays_first() {
    let orchestrator = orchestrator(
        RecordingApplicants::with_score(json!(712)),
        RecordingProperties::default(),
    );
    let mut request = request_in("California", None, 10000.0);
    request.applicants[0].credit_reports.push(CreditReport {
        credit_score: Some(480),
    });

    let fetched = orchestrator.fetch(&mut request, ReportKind::Credit);

    assert_eq!(
        fetched,
        Some(Report::Credit(CreditReport {
            credit_score: Some(712)
        }))
    );
    let applicant = request.primary_applicant().expect("applicant");
    assert_eq!(applicant.credit_reports.len(), 2);
    assert_eq!(
        applicant.latest_credit_report().and_then(|report| report.credit_score),
        Some(480)
    );
}

#[test]
fn mortgage_report_survives_null_fields() {
    let orchestrator = orchestrator(
        RecordingApplicants::default(),
        RecordingProperties::with_payload(json!({
            "total_mortgage_amount": null,
            "pending_mortgage_amount": "not a number",
            "regular_in_payment": true
        })),
    );
    let mut request = request_in("California", None, 10000.0);

    let lookup = orchestrator.fetch_mortgage(&mut request);

    let expected = MortgageReport {
        total_mortgage: None,
        pending_mortgage: None,
        regular_in_payment: Some("true".to_string()),
    };
    assert_eq!(lookup, ReportLookup::Found(expected.clone()));
    let address = request.primary_address().expect("address");
    assert_eq!(address.mortgage_reports, vec![expected]);
}

#[test]
fn property_lookup_receives_the_raw_street() {
    let properties = Arc::new(RecordingProperties::with_pending(json!(5)));
    let orchestrator =
        ReportOrchestrator::new(Arc::new(RecordingApplicants::default()), properties.clone());
    let mut request = request_in("California", None, 10000.0);
    request.addresses[0].street = Some("212 Encounter Bay".to_string());

    let lookup = orchestrator.fetch_mortgage(&mut request);

    assert!(lookup.is_found());
    assert_eq!(properties.calls(), vec!["212 Encounter Bay".to_string()]);
}

#[test]
fn missing_record_is_not_found_and_attaches_nothing() {
    let orchestrator = orchestrator(RecordingApplicants::default(), RecordingProperties::default());
    let mut request = request_in("California", None, 10000.0);

    assert_eq!(orchestrator.fetch_credit(&mut request), ReportLookup::NotFound);
    assert_eq!(orchestrator.fetch_mortgage(&mut request), ReportLookup::NotFound);
    assert!(request.applicants[0].credit_reports.is_empty());
    assert!(request.addresses[0].mortgage_reports.is_empty());
}

#[test]
fn source_failures_are_classified() {
    let mut request = request_in("California", None, 10000.0);

    let timed_out = orchestrator(
        RecordingApplicants::failing(DataSourceError::Timeout),
        RecordingProperties::default(),
    );
    assert_eq!(timed_out.fetch_credit(&mut request), ReportLookup::NotFound);

    let offline = orchestrator(
        RecordingApplicants::default(),
        RecordingProperties::failing(DataSourceError::Unavailable("connection refused".into())),
    );
    assert_eq!(
        offline.fetch_mortgage(&mut request),
        ReportLookup::Failed("connection refused".to_string())
    );
    assert_eq!(offline.fetch(&mut request, ReportKind::Mortgage), None);
}

#[test]
fn malformed_credit_payload_is_not_a_report() {
    let orchestrator = orchestrator(
        RecordingApplicants::with_score(json!("seven hundred")),
        RecordingProperties::default(),
    );
    let mut request = request_in("California", None, 10000.0);

    let lookup = orchestrator.fetch_credit(&mut request);

    assert!(matches!(lookup, ReportLookup::Malformed(_)));
    assert_eq!(orchestrator.fetch(&mut request, ReportKind::Credit), None);
    assert!(request.applicants[0].credit_reports.is_empty());
}

#[test]
fn absent_owner_is_not_found_without_a_lookup() {
    let applicants = Arc::new(RecordingApplicants::with_score(json!(700)));
    let properties = Arc::new(RecordingProperties::with_pending(json!(1)));
    let orchestrator = ReportOrchestrator::new(applicants.clone(), properties.clone());
    let mut request = request_in("California", None, 10000.0);
    request.applicants.clear();
    request.addresses.clear();

    assert_eq!(orchestrator.fetch_credit(&mut request), ReportLookup::NotFound);
    assert_eq!(orchestrator.fetch_mortgage(&mut request), ReportLookup::NotFound);
    assert!(applicants.calls().is_empty());
    assert!(properties.calls().is_empty());
}
