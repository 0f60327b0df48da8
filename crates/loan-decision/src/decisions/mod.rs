//! Loan decisioning: request intake, rule evaluation, and the decision trail.
//!
//! Requests are built from a submission, run through the fixed rule set by the
//! [`Processor`], and persisted through a [`DecisionRepository`]. Rules pull their
//! parameters from a [`RuleBook`] and their facts through the [`ReportOrchestrator`].

pub mod aggregate;
pub mod builder;
pub mod domain;
pub mod processor;
pub mod reports;
pub mod repository;
pub mod review;
pub mod router;
pub mod rules;
pub mod service;
pub mod view;

#[cfg(test)]
mod tests;

pub use aggregate::aggregate;
pub use builder::{build_request, AddressSubmission, BuildError, DecisionSubmission};
pub use domain::{
    Address, Applicant, CreditReport, Decision, DecisionRequest, DecisionValue, FinalStatus,
    MortgageReport, RequestId, RuleName,
};
pub use processor::{ProcessError, Processor};
pub use reports::sources::{
    normalize_street, ApplicantDataSource, DataSourceError, DataSourceLoadError,
    JsonApplicantSource, JsonPropertySource, PropertyDataSource, RawFields,
};
pub use reports::{Report, ReportKind, ReportLookup, ReportOrchestrator};
pub use repository::{DecisionRepository, RepositoryError};
pub use review::{review, RuleReview};
pub use router::decision_router;
pub use rules::{
    rule_for, run_rule, CreditRule, EffectiveConfig, MortgageRule, Rule, RuleBook,
    RuleBookError, RuleContext, RuleDocument, RuleError, RULE_SET,
};
pub use service::{DecisionService, DecisionServiceError};
pub use view::{DecisionRequestView, FundingOption, FUNDING_OPTIONS};
