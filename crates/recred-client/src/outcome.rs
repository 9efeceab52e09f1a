//! Per-user outcome reporting.

use serde::Serialize;

use crate::models::OperationOutcome;

/// Placeholder shown when no secret was assigned.
pub const NO_SECRET: &str = "N/A";

/// One display/export row of the outcome report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRow {
    pub username: String,
    pub outcome: String,
    pub new_password: String,
}

/// Map outcomes to display rows, one per outcome, in order.
///
/// Pure transform: rows are in 1:1 correspondence with the input and the
/// input is never mutated.
#[must_use]
pub fn rows(outcomes: &[OperationOutcome]) -> Vec<OutcomeRow> {
    outcomes
        .iter()
        .map(|outcome| OutcomeRow {
            username: outcome.username.clone(),
            outcome: if outcome.succeeded() {
                "Password updated".to_string()
            } else {
                format!("Failed (HTTP {})", outcome.status_code)
            },
            new_password: outcome
                .secret
                .clone()
                .unwrap_or_else(|| NO_SECRET.to_string()),
        })
        .collect()
}
