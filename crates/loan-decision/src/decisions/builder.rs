use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{Address, Applicant, DecisionRequest};

/// Inbound application payload as posted by the loan origination front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSubmission {
    /// Number or numeric string.
    #[serde(default)]
    pub application_id: Option<Value>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub ssn: Option<String>,
    #[serde(default)]
    pub income: Option<f64>,
    #[serde(default)]
    pub income_type: Option<String>,
    #[serde(default)]
    pub requested_loan_amount: Option<f64>,
    #[serde(default)]
    pub address: Option<AddressSubmission>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSubmission {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub unit_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("application id is required")]
    MissingApplicationId,
    #[error("application id '{0}' is not an integer")]
    InvalidApplicationId(String),
    #[error("address parameters cannot be empty")]
    MissingAddress,
    #[error("applicant parameters cannot be empty")]
    MissingApplicant,
}

/// Build a request with exactly one applicant and one address, or nothing at all.
pub fn build_request(submission: DecisionSubmission) -> Result<DecisionRequest, BuildError> {
    let application_id = parse_application_id(submission.application_id.as_ref())?;
    let address = build_address(submission.address)?;

    let applicant = Applicant {
        first_name: submission.first_name,
        last_name: submission.last_name,
        ssn: submission.ssn,
        income: submission.income,
        income_type: submission.income_type,
        requested_loan_amount: submission.requested_loan_amount,
        credit_reports: Vec::new(),
    };
    if applicant == Applicant::default() {
        return Err(BuildError::MissingApplicant);
    }

    Ok(DecisionRequest::new(application_id, applicant, address))
}

fn parse_application_id(value: Option<&Value>) -> Result<i64, BuildError> {
    match value {
        None | Some(Value::Null) => Err(BuildError::MissingApplicationId),
        Some(Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| BuildError::InvalidApplicationId(number.to_string())),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| BuildError::InvalidApplicationId(text.clone())),
        Some(other) => Err(BuildError::InvalidApplicationId(other.to_string())),
    }
}

fn build_address(submission: Option<AddressSubmission>) -> Result<Address, BuildError> {
    let submission = submission.ok_or(BuildError::MissingAddress)?;
    if submission == AddressSubmission::default() {
        return Err(BuildError::MissingAddress);
    }

    Ok(Address {
        street: submission.street,
        unit_number: submission.unit_number,
        city: submission.city,
        zip: submission.zip,
        state: submission.state,
        county: submission.county,
        mortgage_reports: Vec::new(),
    })
}
