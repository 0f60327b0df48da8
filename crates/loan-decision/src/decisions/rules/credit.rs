use super::{Rule, RuleContext, RuleError};
use crate::decisions::domain::{DecisionValue, RuleName};
use crate::decisions::reports::{Report, ReportKind};

pub(crate) const THRESHOLD_KEY: &str = "credit_score_threshold";

/// Applicant's credit score must be strictly above the configured threshold.
pub struct CreditRule;

impl Rule for CreditRule {
    fn name(&self) -> RuleName {
        RuleName::Credit
    }

    fn message(&self) -> &'static str {
        "The credit score of applicant is checked"
    }

    fn required_reports(&self) -> &'static [ReportKind] {
        &[ReportKind::Credit]
    }

    fn evaluate(&self, context: &RuleContext<'_>) -> Result<DecisionValue, RuleError> {
        let Some(Report::Credit(report)) = context.first_report() else {
            return Ok(DecisionValue::Unavailable);
        };
        let threshold = context.config.integer(THRESHOLD_KEY)?;
        Ok(credit_decision(report.credit_score, threshold))
    }
}

/// A score equal to the threshold declines.
pub(crate) fn credit_decision(score: Option<i64>, threshold: i64) -> DecisionValue {
    match score {
        Some(score) if score > threshold => DecisionValue::Eligible,
        _ => DecisionValue::Decline,
    }
}
