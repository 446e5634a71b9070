use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

/// Per-call budgets applied to every collaborator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub library_timeout: Duration,
    pub decision_timeout: Duration,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            library_timeout: Duration::from_secs(10),
            decision_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&AppConfig> for EvaluationConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            library_timeout: config.library_api.timeout,
            decision_timeout: config.decision_engine.timeout,
        }
    }
}
