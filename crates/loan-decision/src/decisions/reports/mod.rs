//! Turns raw data-source payloads into typed reports attached to the request.
//!
//! Every failure below this boundary (missing record, timeout, unusable payload) is
//! logged and reported as a non-`Found` lookup; nothing here returns an error.

mod parse;
pub mod sources;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{CreditReport, DecisionRequest, MortgageReport};
use parse::{parse_credit_report, parse_mortgage_report};
use sources::{ApplicantDataSource, DataSourceError, PropertyDataSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Credit,
    Mortgage,
}

impl ReportKind {
    pub const fn label(self) -> &'static str {
        match self {
            ReportKind::Credit => "Credit",
            ReportKind::Mortgage => "Mortgage",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed fact produced by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Credit(CreditReport),
    Mortgage(MortgageReport),
}

/// Outcome of a single report fetch, before it is collapsed to present/absent.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportLookup<T> {
    Found(T),
    /// No owning entity, no record for the key, or the lookup timed out.
    NotFound,
    /// A payload arrived but could not be turned into a report.
    Malformed(String),
    /// The data source failed for another reason.
    Failed(String),
}

impl<T> ReportLookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            ReportLookup::Found(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ReportLookup::Found(_))
    }

    fn from_source_error(error: DataSourceError) -> Self {
        match error {
            DataSourceError::NotFound { .. } | DataSourceError::Timeout => ReportLookup::NotFound,
            DataSourceError::Unavailable(reason) => ReportLookup::Failed(reason),
        }
    }

    fn log(&self, request: &str, kind: ReportKind) {
        match self {
            ReportLookup::Found(_) => debug!(request, report = %kind, "report attached"),
            ReportLookup::NotFound => warn!(request, report = %kind, "report not found"),
            ReportLookup::Malformed(reason) => {
                warn!(request, report = %kind, reason = %reason, "report payload unusable")
            }
            ReportLookup::Failed(reason) => {
                warn!(request, report = %kind, reason = %reason, "report fetch failed")
            }
        }
    }
}

/// Fetches reports from the applicant and property sources for one request at a time.
pub struct ReportOrchestrator<A, P> {
    applicants: Arc<A>,
    properties: Arc<P>,
}

impl<A, P> Clone for ReportOrchestrator<A, P> {
    fn clone(&self) -> Self {
        Self {
            applicants: self.applicants.clone(),
            properties: self.properties.clone(),
        }
    }
}

impl<A, P> ReportOrchestrator<A, P>
where
    A: ApplicantDataSource,
    P: PropertyDataSource,
{
    pub fn new(applicants: Arc<A>, properties: Arc<P>) -> Self {
        Self {
            applicants,
            properties,
        }
    }

    /// Fetch, parse and attach one report; `None` for every kind of failure.
    pub fn fetch(&self, request: &mut DecisionRequest, kind: ReportKind) -> Option<Report> {
        match kind {
            ReportKind::Credit => self.fetch_credit(request).found().map(Report::Credit),
            ReportKind::Mortgage => self.fetch_mortgage(request).found().map(Report::Mortgage),
        }
    }

    pub fn fetch_credit(&self, request: &mut DecisionRequest) -> ReportLookup<CreditReport> {
        let label = request.log_label();
        let lookup = match request.primary_applicant_mut() {
            None => ReportLookup::NotFound,
            Some(applicant) => {
                let key = applicant.ssn.clone().unwrap_or_default();
                let lookup = match self.applicants.lookup(&key) {
                    Ok(fields) => parse_credit_report(&fields),
                    Err(err) => ReportLookup::from_source_error(err),
                };
                if let ReportLookup::Found(report) = &lookup {
                    applicant.credit_reports.push(*report);
                }
                lookup
            }
        };
        lookup.log(&label, ReportKind::Credit);
        lookup
    }

    pub fn fetch_mortgage(&self, request: &mut DecisionRequest) -> ReportLookup<MortgageReport> {
        let label = request.log_label();
        let lookup = match request.primary_address_mut() {
            None => ReportLookup::NotFound,
            Some(address) => {
                let key = address.street.clone().unwrap_or_default();
                let lookup = match self.properties.lookup(&key) {
                    Ok(fields) => parse_mortgage_report(&fields),
                    Err(err) => ReportLookup::from_source_error(err),
                };
                if let ReportLookup::Found(report) = &lookup {
                    address.mortgage_reports.push(report.clone());
                }
                lookup
            }
        };
        lookup.log(&label, ReportKind::Mortgage);
        lookup
    }
}
