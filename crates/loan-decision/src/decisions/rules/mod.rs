//! Eligibility rules and the shared driver that runs them.
//!
//! A rule only describes itself (name, message, required reports) and how it judges an
//! evaluation context. [`run_rule`] owns the common sequence: resolve config, check the
//! enabled flag, fetch reports, evaluate, append the decision.

pub mod book;
pub mod config;
mod credit;
mod mortgage;

pub use book::{RuleBook, RuleBookError};
pub use config::{EffectiveConfig, RuleDocument};
pub use credit::CreditRule;
pub use mortgage::MortgageRule;

pub(crate) use credit::{credit_decision, THRESHOLD_KEY as CREDIT_THRESHOLD_KEY};
pub(crate) use mortgage::{mortgage_decision, THRESHOLD_KEY as MORTGAGE_THRESHOLD_KEY};

use tracing::{debug, warn};

use super::domain::{Address, Decision, DecisionRequest, DecisionValue, RuleName};
use super::reports::sources::{ApplicantDataSource, PropertyDataSource};
use super::reports::{Report, ReportKind, ReportOrchestrator};

/// Rules in evaluation order; decisions are appended in this order.
pub const RULE_SET: [RuleName; 2] = [RuleName::Mortgage, RuleName::Credit];

pub fn rule_for(name: RuleName) -> &'static dyn Rule {
    match name {
        RuleName::Mortgage => &MortgageRule,
        RuleName::Credit => &CreditRule,
    }
}

pub trait Rule: Send + Sync {
    fn name(&self) -> RuleName;

    fn message(&self) -> &'static str;

    fn required_reports(&self) -> &'static [ReportKind];

    fn evaluate(&self, context: &RuleContext<'_>) -> Result<DecisionValue, RuleError>;

    /// Effective config for the address; an unavailable document resolves empty.
    fn load_config(&self, book: &RuleBook, address: Option<&Address>) -> EffectiveConfig {
        let document = match book.document(self.name()) {
            Ok(document) => document,
            Err(err) => {
                warn!(rule = %self.name(), error = %err, "treating rule config as empty");
                return EffectiveConfig::empty();
            }
        };
        let state = address.and_then(|address| address.state.as_deref());
        let county = address.and_then(|address| address.county.as_deref());
        document.resolve(state, county)
    }
}

/// Immutable inputs to one evaluation.
pub struct RuleContext<'a> {
    pub request: &'a DecisionRequest,
    pub config: EffectiveConfig,
    /// Aligned with [`Rule::required_reports`].
    pub reports: Vec<Option<Report>>,
}

impl RuleContext<'_> {
    pub fn first_report(&self) -> Option<&Report> {
        self.reports.first().and_then(Option::as_ref)
    }
}

/// Failures that abort the whole request rather than degrading a single decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule parameter '{key}' must be an integer, found {found}")]
    InvalidParameter { key: &'static str, found: String },
    #[error("request has no primary applicant")]
    MissingApplicant,
    #[error("primary applicant has no declared income")]
    MissingIncome,
}

/// Run one rule against the request.
///
/// A disabled rule fetches nothing and records nothing (`Ok(None)`).
pub fn run_rule<A, P>(
    rule: &dyn Rule,
    request: &mut DecisionRequest,
    book: &RuleBook,
    reports: &ReportOrchestrator<A, P>,
) -> Result<Option<Decision>, RuleError>
where
    A: ApplicantDataSource,
    P: PropertyDataSource,
{
    let config = rule.load_config(book, request.primary_address());
    if !config.is_enabled() {
        debug!(request = %request.log_label(), rule = %rule.name(), "rule disabled");
        return Ok(None);
    }

    let fetched = rule
        .required_reports()
        .iter()
        .map(|kind| reports.fetch(request, *kind))
        .collect();

    let context = RuleContext {
        request: &*request,
        config,
        reports: fetched,
    };
    let value = rule.evaluate(&context)?;

    let decision = Decision::new(rule.name(), value, rule.message());
    request.record_decision(decision.clone());
    debug!(
        request = %request.log_label(),
        rule = %rule.name(),
        decision = value.label(),
        "rule evaluated"
    );
    Ok(Some(decision))
}
