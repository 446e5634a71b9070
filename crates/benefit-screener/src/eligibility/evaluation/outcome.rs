use serde::{Deserialize, Serialize};

use super::super::domain::EvaluationResult;

/// Check-level result that remembers why a verdict could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOutcome {
    Determined(EvaluationResult),
    Indeterminate(IndeterminateCause),
}

impl CheckOutcome {
    pub fn result(&self) -> EvaluationResult {
        match self {
            CheckOutcome::Determined(result) => *result,
            CheckOutcome::Indeterminate(_) => EvaluationResult::UnableToDetermine,
        }
    }

    pub fn cause(&self) -> Option<&IndeterminateCause> {
        match self {
            CheckOutcome::Determined(_) => None,
            CheckOutcome::Indeterminate(cause) => Some(cause),
        }
    }

    /// Map a provider label, keeping unknown labels as an explicit cause.
    pub fn from_label(label: &str) -> Self {
        match EvaluationResult::from_label(label) {
            Some(result) => CheckOutcome::Determined(result),
            None => {
                CheckOutcome::Indeterminate(IndeterminateCause::UnrecognizedLabel(label.to_string()))
            }
        }
    }
}

impl From<EvaluationResult> for CheckOutcome {
    fn from(result: EvaluationResult) -> Self {
        CheckOutcome::Determined(result)
    }
}

/// Reasons a remote evaluation was downgraded to `UNABLE_TO_DETERMINE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum IndeterminateCause {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("call exceeded its time budget")]
    Timeout,
    #[error("provider answered with status {0}")]
    Status(u16),
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("unrecognized result label '{0}'")]
    UnrecognizedLabel(String),
}
