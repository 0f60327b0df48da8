use super::domain::{Decision, DecisionValue, FinalStatus};

/// Any `decline` or `unavailable` decision declines the whole request.
///
/// Pure over the slice, so recomputing after every append is always safe.
pub fn aggregate(decisions: &[Decision]) -> FinalStatus {
    let blocked = decisions.iter().any(|decision| {
        matches!(
            decision.value(),
            DecisionValue::Decline | DecisionValue::Unavailable
        )
    });

    if blocked {
        FinalStatus::Decline
    } else {
        FinalStatus::Eligible
    }
}
