use crate::infra::{decision_service, ApiDecisionService};
use clap::Args;
use loan_decision::config::AppConfig;
use loan_decision::decisions::{DecisionRequestView, DecisionSubmission};
use loan_decision::error::AppError;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON submission in the same shape the HTTP endpoint accepts
    #[arg(long)]
    pub(crate) input: PathBuf,
}

/// Run one submission through the configured rules and print the response body.
pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = fs::read_to_string(&args.input)?;
    let service = decision_service(&config)?;

    let view = evaluate_submission(&service, &raw)?;
    let rendered = serde_json::to_string_pretty(&view).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn evaluate_submission(
    service: &ApiDecisionService,
    raw: &str,
) -> Result<DecisionRequestView, AppError> {
    let submission: DecisionSubmission =
        serde_json::from_str(raw).map_err(AppError::Submission)?;
    let request = service.submit(submission)?;
    Ok(DecisionRequestView::from(&request))
}
