use serde::Serialize;

use super::domain::{Address, Applicant, DecisionRequest, FinalStatus, RequestId};

/// Response body for an evaluated request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRequestView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    pub application_id: i64,
    pub address: AddressView,
    pub applicant: ApplicantView,
    pub final_decision: &'static str,
    pub decision: Vec<DecisionView>,
    pub funding_options: Vec<FundingOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddressView {
    pub street: Option<String>,
    pub unit_number: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicantView {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub ssn: Option<String>,
    pub income: Option<f64>,
    pub income_type: Option<String>,
    pub requested_loan_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionView {
    pub rule_name: &'static str,
    pub decision: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FundingOption {
    pub years: u8,
    pub interest_rate: u8,
    pub emi: u32,
}

/// Offered only to eligible requests.
pub const FUNDING_OPTIONS: [FundingOption; 2] = [
    FundingOption {
        years: 5,
        interest_rate: 6,
        emi: 100,
    },
    FundingOption {
        years: 10,
        interest_rate: 6,
        emi: 60,
    },
];

impl From<&Address> for AddressView {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            unit_number: address.unit_number.clone(),
            city: address.city.clone(),
            zip: address.zip.clone(),
            state: address.state.clone(),
            county: address.county.clone(),
        }
    }
}

impl From<&Applicant> for ApplicantView {
    fn from(applicant: &Applicant) -> Self {
        Self {
            first_name: applicant.first_name.clone(),
            last_name: applicant.last_name.clone(),
            ssn: applicant.ssn.clone(),
            income: applicant.income,
            income_type: applicant.income_type.clone(),
            requested_loan_amount: applicant.requested_loan_amount,
        }
    }
}

impl From<&DecisionRequest> for DecisionRequestView {
    fn from(request: &DecisionRequest) -> Self {
        let funding_options = match request.final_status() {
            FinalStatus::Eligible => FUNDING_OPTIONS.to_vec(),
            FinalStatus::Decline => Vec::new(),
        };

        Self {
            request_id: request.id,
            application_id: request.application_id,
            address: request
                .primary_address()
                .map(AddressView::from)
                .unwrap_or_default(),
            applicant: request
                .primary_applicant()
                .map(ApplicantView::from)
                .unwrap_or_default(),
            final_decision: request.final_status().label(),
            decision: request
                .decisions()
                .iter()
                .map(|decision| DecisionView {
                    rule_name: decision.rule_name().as_str(),
                    decision: decision.value().label(),
                    message: decision.message().to_string(),
                })
                .collect(),
            funding_options,
        }
    }
}
