use super::{Rule, RuleContext, RuleError};
use crate::decisions::domain::{DecisionValue, RuleName};
use crate::decisions::reports::{Report, ReportKind};

pub(crate) const THRESHOLD_KEY: &str = "mortgage_threshold";

/// Pending mortgage on the property must not exceed income times the threshold.
pub struct MortgageRule;

impl Rule for MortgageRule {
    fn name(&self) -> RuleName {
        RuleName::Mortgage
    }

    fn message(&self) -> &'static str {
        "The outstanding mortgage loan on the applicants property is checked in relation with his income."
    }

    fn required_reports(&self) -> &'static [ReportKind] {
        &[ReportKind::Mortgage]
    }

    fn evaluate(&self, context: &RuleContext<'_>) -> Result<DecisionValue, RuleError> {
        let Some(Report::Mortgage(report)) = context.first_report() else {
            return Ok(DecisionValue::Unavailable);
        };
        let threshold = context.config.integer(THRESHOLD_KEY)?;
        let Some(pending) = report.pending_mortgage else {
            return Ok(DecisionValue::Decline);
        };
        let income = context
            .request
            .primary_applicant()
            .ok_or(RuleError::MissingApplicant)?
            .income
            .ok_or(RuleError::MissingIncome)?;
        Ok(mortgage_decision(pending, income, threshold))
    }
}

/// Pending exactly equal to the allowance passes.
pub(crate) fn mortgage_decision(pending: i64, income: f64, threshold: i64) -> DecisionValue {
    let allowed = income * threshold as f64;
    if (pending as f64) <= allowed {
        DecisionValue::Eligible
    } else {
        DecisionValue::Decline
    }
}
