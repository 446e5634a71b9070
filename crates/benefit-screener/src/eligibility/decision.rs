//! Decision-model collaborators used by custom checks.
//!
//! The rules engine itself is a black box; this module only carries the
//! contract (`DecisionModelEvaluator`), the artifact lookup
//! (`ArtifactLocator`), and an HTTP adapter for engines reachable over the
//! network.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::domain::EvaluationResult;
use crate::config::RemoteEndpointConfig;

/// Failures while executing a decision model. These propagate to the caller.
#[derive(Debug, thiserror::Error)]
pub enum DecisionModelError {
    #[error("decision model {model_path} could not be resolved: {detail}")]
    UnresolvableModel { model_path: String, detail: String },
    #[error("decision '{decision_name}' not found in {model_path}")]
    UnknownDecision {
        model_path: String,
        decision_name: String,
    },
    #[error("decision engine unreachable: {0}")]
    Transport(String),
    #[error("decision engine answered with status {0}")]
    Status(u16),
    #[error("decision engine returned a malformed body: {0}")]
    Malformed(String),
    #[error("decision evaluation exceeded {0:?}")]
    Timeout(Duration),
}

/// Executes a named decision of a decision model against input data.
#[async_trait]
pub trait DecisionModelEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        model_path: &str,
        decision_name: &str,
        inputs: &Map<String, Value>,
        parameters: &Map<String, Value>,
    ) -> Result<EvaluationResult, DecisionModelError>;
}

/// Resolves a check identifier to the location of its decision model.
pub trait ArtifactLocator: Send + Sync {
    fn path_for_check(&self, check_id: &str) -> String;
}

/// Storage layout `<root>/checks/<check id>.dmn`.
#[derive(Debug, Clone)]
pub struct StorageArtifactLocator {
    root: String,
}

impl StorageArtifactLocator {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactLocator for StorageArtifactLocator {
    fn path_for_check(&self, check_id: &str) -> String {
        let root = self.root.trim_end_matches('/');
        if root.is_empty() {
            format!("checks/{check_id}.dmn")
        } else {
            format!("{root}/checks/{check_id}.dmn")
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DecisionRequest<'a> {
    model_path: &'a str,
    decision_name: &'a str,
    inputs: &'a Map<String, Value>,
    parameters: &'a Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DecisionResponse {
    result: Option<String>,
}

/// Adapter for a rules engine exposing `POST <base>/evaluate`.
pub struct HttpDecisionModelEvaluator {
    endpoint: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl HttpDecisionModelEvaluator {
    pub fn new(config: &RemoteEndpointConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("benefit-screener/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            endpoint: format!("{}/evaluate", config.base_url.trim_end_matches('/')),
            timeout: config.timeout,
            http_client,
        })
    }
}

#[async_trait]
impl DecisionModelEvaluator for HttpDecisionModelEvaluator {
    async fn evaluate(
        &self,
        model_path: &str,
        decision_name: &str,
        inputs: &Map<String, Value>,
        parameters: &Map<String, Value>,
    ) -> Result<EvaluationResult, DecisionModelError> {
        let request = DecisionRequest {
            model_path,
            decision_name,
            inputs,
            parameters,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    DecisionModelError::Timeout(self.timeout)
                } else {
                    DecisionModelError::Transport(err.to_string())
                }
            })?;

        match response.status().as_u16() {
            200 => {}
            404 => {
                return Err(DecisionModelError::UnknownDecision {
                    model_path: model_path.to_string(),
                    decision_name: decision_name.to_string(),
                })
            }
            422 => {
                let detail = response.text().await.unwrap_or_default();
                return Err(DecisionModelError::UnresolvableModel {
                    model_path: model_path.to_string(),
                    detail,
                });
            }
            other => return Err(DecisionModelError::Status(other)),
        }

        let body: DecisionResponse = response
            .json()
            .await
            .map_err(|err| DecisionModelError::Malformed(err.to_string()))?;

        let result = body
            .result
            .as_deref()
            .and_then(EvaluationResult::from_label)
            .unwrap_or(EvaluationResult::UnableToDetermine);

        debug!(model_path, decision_name, %result, "decision model evaluated");
        Ok(result)
    }
}
