use serde_json::Value;

use super::sources::RawFields;
use super::ReportLookup;
use crate::decisions::domain::{CreditReport, MortgageReport};

/// Numbers truncate toward zero, numeric strings parse, anything else is absent.
fn coerce_integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite())
                .map(|float| float.trunc() as i64)
        }),
        Value::String(text) => text.parse::<i64>().ok(),
        _ => None,
    }
}

fn stringify(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// A credit report without a usable score is not a report.
pub(crate) fn parse_credit_report(fields: &RawFields) -> ReportLookup<CreditReport> {
    if fields.is_empty() {
        return ReportLookup::Malformed("empty applicant payload".to_string());
    }

    match coerce_integer(fields.get("credit_score")) {
        Some(score) => ReportLookup::Found(CreditReport {
            credit_score: Some(score),
        }),
        None => ReportLookup::Malformed(format!(
            "credit_score missing or not an integer: {}",
            fields.get("credit_score").unwrap_or(&Value::Null)
        )),
    }
}

/// Mortgage fields are independently nullable; the report survives partial data.
pub(crate) fn parse_mortgage_report(fields: &RawFields) -> ReportLookup<MortgageReport> {
    if fields.is_empty() {
        return ReportLookup::Malformed("empty property payload".to_string());
    }

    ReportLookup::Found(MortgageReport {
        total_mortgage: coerce_integer(fields.get("total_mortgage_amount")),
        pending_mortgage: coerce_integer(fields.get("pending_mortgage_amount")),
        regular_in_payment: stringify(fields.get("regular_in_payment")),
    })
}
