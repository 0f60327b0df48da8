use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::aggregate;

/// Storage identity assigned when a request is first saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A loan application under evaluation together with its decision trail.
///
/// Only the first applicant and the first address are consulted by the rules. The
/// decision list is append-only and the final status is recomputed on every append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub id: Option<RequestId>,
    pub application_id: i64,
    pub applicants: Vec<Applicant>,
    pub addresses: Vec<Address>,
    decisions: Vec<Decision>,
    final_status: FinalStatus,
    pub created_at: DateTime<Utc>,
}

impl DecisionRequest {
    pub fn new(application_id: i64, applicant: Applicant, address: Address) -> Self {
        Self {
            id: None,
            application_id,
            applicants: vec![applicant],
            addresses: vec![address],
            decisions: Vec::new(),
            final_status: aggregate(&[]),
            created_at: Utc::now(),
        }
    }

    pub fn primary_applicant(&self) -> Option<&Applicant> {
        self.applicants.first()
    }

    pub fn primary_applicant_mut(&mut self) -> Option<&mut Applicant> {
        self.applicants.first_mut()
    }

    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses.first()
    }

    pub fn primary_address_mut(&mut self) -> Option<&mut Address> {
        self.addresses.first_mut()
    }

    /// Decisions in evaluation order.
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn final_status(&self) -> FinalStatus {
        self.final_status
    }

    pub(crate) fn record_decision(&mut self, decision: Decision) {
        self.decisions.push(decision);
        self.refresh_final_status();
    }

    /// Recompute the aggregate status from the current decisions.
    pub fn refresh_final_status(&mut self) -> FinalStatus {
        self.final_status = aggregate(&self.decisions);
        self.final_status
    }

    /// Label used in log lines: the storage id when present, the application id otherwise.
    pub fn log_label(&self) -> String {
        match self.id {
            Some(id) => format!("request-{id}"),
            None => format!("application-{}", self.application_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Identity value used as the applicant data-source key.
    pub ssn: Option<String>,
    pub income: Option<f64>,
    pub income_type: Option<String>,
    pub requested_loan_amount: Option<f64>,
    pub credit_reports: Vec<CreditReport>,
}

impl Applicant {
    pub fn latest_credit_report(&self) -> Option<&CreditReport> {
        self.credit_reports.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub unit_number: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub mortgage_reports: Vec<MortgageReport>,
}

impl Address {
    pub fn latest_mortgage_report(&self) -> Option<&MortgageReport> {
        self.mortgage_reports.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditReport {
    /// `None` means the bureau had no score for the applicant.
    pub credit_score: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageReport {
    pub total_mortgage: Option<i64>,
    pub pending_mortgage: Option<i64>,
    /// Advisory only.
    pub regular_in_payment: Option<String>,
}

/// Identity of a rule in the fixed evaluation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleName {
    #[serde(rename = "mortgage_rule")]
    Mortgage,
    #[serde(rename = "credit_rule")]
    Credit,
}

impl RuleName {
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleName::Mortgage => "mortgage_rule",
            RuleName::Credit => "credit_rule",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionValue {
    Eligible,
    Decline,
    Unavailable,
}

impl DecisionValue {
    pub const fn label(self) -> &'static str {
        match self {
            DecisionValue::Eligible => "eligible",
            DecisionValue::Decline => "decline",
            DecisionValue::Unavailable => "unavailable",
        }
    }
}

/// Outcome of one rule run. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    rule_name: RuleName,
    decision: DecisionValue,
    message: String,
}

impl Decision {
    pub fn new(rule_name: RuleName, decision: DecisionValue, message: impl Into<String>) -> Self {
        Self {
            rule_name,
            decision,
            message: message.into(),
        }
    }

    pub fn rule_name(&self) -> RuleName {
        self.rule_name
    }

    pub fn value(&self) -> DecisionValue {
        self.decision
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Aggregate outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    Eligible,
    Decline,
}

impl FinalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FinalStatus::Eligible => "eligible",
            FinalStatus::Decline => "decline",
        }
    }
}
