use serde::Serialize;

use super::domain::{DecisionRequest, DecisionValue, RuleName};
use super::rules::{
    credit_decision, mortgage_decision, rule_for, EffectiveConfig, RuleBook,
    CREDIT_THRESHOLD_KEY, MORTGAGE_THRESHOLD_KEY, RULE_SET,
};

/// Explanation of how one rule sees an already processed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleReview {
    pub rule_name: RuleName,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
    /// Credit score or pending mortgage read from the first attached report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<DecisionValue>,
    pub message: String,
}

/// Explain every rule against the reports already attached to `request`.
///
/// Reads only; nothing is fetched and the request is left untouched.
pub fn review(request: &DecisionRequest, book: &RuleBook) -> Vec<RuleReview> {
    RULE_SET
        .into_iter()
        .map(|name| {
            let config = rule_for(name).load_config(book, request.primary_address());
            if !config.is_enabled() {
                return RuleReview {
                    rule_name: name,
                    enabled: false,
                    threshold: None,
                    observed: None,
                    decision: None,
                    message: format!("{name} not enabled for {}", location(request)),
                };
            }
            match name {
                RuleName::Credit => review_credit(request, &config),
                RuleName::Mortgage => review_mortgage(request, &config),
            }
        })
        .collect()
}

fn location(request: &DecisionRequest) -> String {
    let address = request.primary_address();
    let state = address
        .and_then(|address| address.state.as_deref())
        .unwrap_or("unknown state");
    match address.and_then(|address| address.county.as_deref()) {
        Some(county) => format!("{state} - {county}"),
        None => state.to_string(),
    }
}

/// Missing report: evaluation stops here without reading the threshold.
fn unavailable(name: RuleName, threshold: Option<i64>, message: &str) -> RuleReview {
    RuleReview {
        rule_name: name,
        enabled: true,
        threshold,
        observed: None,
        decision: Some(DecisionValue::Unavailable),
        message: message.to_string(),
    }
}

fn invalid_threshold(name: RuleName, message: String) -> RuleReview {
    RuleReview {
        rule_name: name,
        enabled: true,
        threshold: None,
        observed: None,
        decision: None,
        message,
    }
}

fn review_credit(request: &DecisionRequest, config: &EffectiveConfig) -> RuleReview {
    let report = request
        .primary_applicant()
        .and_then(|applicant| applicant.latest_credit_report());
    let Some(report) = report else {
        return unavailable(
            RuleName::Credit,
            config.integer(CREDIT_THRESHOLD_KEY).ok(),
            "credit score not available",
        );
    };
    let threshold = match config.integer(CREDIT_THRESHOLD_KEY) {
        Ok(threshold) => threshold,
        Err(err) => return invalid_threshold(RuleName::Credit, err.to_string()),
    };

    let decision = credit_decision(report.credit_score, threshold);
    let message = match (report.credit_score, decision) {
        (Some(score), DecisionValue::Eligible) => {
            format!("credit score {score} above threshold {threshold}")
        }
        (Some(score), _) => format!("credit score {score} not above threshold {threshold}"),
        (None, _) => "credit report carries no score".to_string(),
    };

    RuleReview {
        rule_name: RuleName::Credit,
        enabled: true,
        threshold: Some(threshold),
        observed: report.credit_score,
        decision: Some(decision),
        message,
    }
}

fn review_mortgage(request: &DecisionRequest, config: &EffectiveConfig) -> RuleReview {
    let report = request
        .primary_address()
        .and_then(|address| address.latest_mortgage_report());
    let Some(report) = report else {
        return unavailable(
            RuleName::Mortgage,
            config.integer(MORTGAGE_THRESHOLD_KEY).ok(),
            "mortgage information not available",
        );
    };
    let threshold = match config.integer(MORTGAGE_THRESHOLD_KEY) {
        Ok(threshold) => threshold,
        Err(err) => return invalid_threshold(RuleName::Mortgage, err.to_string()),
    };
    let income = request
        .primary_applicant()
        .and_then(|applicant| applicant.income);

    let (observed, decision, message) = match (report.pending_mortgage, income) {
        (None, _) => (
            None,
            Some(DecisionValue::Decline),
            "pending mortgage not reported".to_string(),
        ),
        (Some(pending), None) => (
            Some(pending),
            None,
            "declared income missing".to_string(),
        ),
        (Some(pending), Some(income)) => {
            let decision = mortgage_decision(pending, income, threshold);
            let allowed = income * threshold as f64;
            let verdict = if decision == DecisionValue::Eligible {
                "within"
            } else {
                "exceeds"
            };
            (
                Some(pending),
                Some(decision),
                format!(
                    "pending mortgage {pending} {verdict} allowance {allowed} (income {income} x {threshold})"
                ),
            )
        }
    };

    RuleReview {
        rule_name: RuleName::Mortgage,
        enabled: true,
        threshold: Some(threshold),
        observed,
        decision,
        message,
    }
}
