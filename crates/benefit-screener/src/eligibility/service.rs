use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::catalog::LibraryCatalog;
use super::decision::DecisionModelError;
use super::domain::{ApplicantInput, CheckConfig, EvaluationResult, Screener};
use super::evaluation::{EligibilityEngine, ScreenerVerdict};
use super::repository::{RepositoryError, ScreenerRepository};

/// Body of a single working-check evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateCheckRequest {
    pub check_config: CheckConfig,
    #[serde(default)]
    pub input_data: Map<String, Value>,
}

/// Service composing the repository, the evaluation engine and the catalog.
pub struct ScreenerEvaluationService<R> {
    repository: Arc<R>,
    engine: Arc<EligibilityEngine>,
    catalog: Arc<LibraryCatalog>,
}

impl<R> ScreenerEvaluationService<R>
where
    R: ScreenerRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: EligibilityEngine, catalog: LibraryCatalog) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &LibraryCatalog {
        &self.catalog
    }

    /// Evaluate a published screener; anyone may call this.
    pub async fn evaluate_published(
        &self,
        screener_id: &str,
        input: &ApplicantInput,
    ) -> Result<ScreenerVerdict, ScreenerServiceError> {
        let Some(screener) = self.repository.published_screener(screener_id)? else {
            info!(screener_id, "published screener not found");
            return Err(ScreenerServiceError::NotFound("screener"));
        };

        self.evaluate(&screener, input).await
    }

    /// Evaluate the owner's working copy of a screener.
    pub async fn evaluate_working(
        &self,
        requester: Option<&str>,
        screener_id: &str,
        input: &ApplicantInput,
    ) -> Result<ScreenerVerdict, ScreenerServiceError> {
        let requester = requester.ok_or(ScreenerServiceError::Unauthorized)?;
        if screener_id.trim().is_empty() {
            return Err(ScreenerServiceError::Unauthorized);
        }

        let screener = self
            .repository
            .working_screener(screener_id)?
            .filter(|screener| screener.is_owned_by(requester))
            .ok_or(ScreenerServiceError::Unauthorized)?;

        self.evaluate(&screener, input).await
    }

    /// Evaluate one of the requester's custom checks directly against its model.
    pub async fn evaluate_working_check(
        &self,
        requester: Option<&str>,
        check_id: Option<&str>,
        request: EvaluateCheckRequest,
    ) -> Result<EvaluationResult, ScreenerServiceError> {
        let requester = requester.ok_or(ScreenerServiceError::Unauthorized)?;
        let check_id = check_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ScreenerServiceError::BadRequest(
                    "missing required query parameter: checkId".to_string(),
                )
            })?;

        let Some(check) = self.repository.working_custom_check(requester, check_id)? else {
            info!(check_id, "custom check not found");
            return Err(ScreenerServiceError::NotFound("check"));
        };

        let result = self
            .engine
            .checks()
            .evaluate_decision_model(
                &check.id,
                &request.check_config.check_name,
                &request.input_data,
                &request.check_config.parameters,
            )
            .await?;
        Ok(result)
    }

    async fn evaluate(
        &self,
        screener: &Screener,
        input: &ApplicantInput,
    ) -> Result<ScreenerVerdict, ScreenerServiceError> {
        if screener.benefits.is_empty() {
            info!(screener_id = screener.id.as_str(), "screener has no benefits");
            return Err(ScreenerServiceError::NotFound("benefits"));
        }

        Ok(self.engine.evaluate_screener(screener, input).await?)
    }
}

/// Error raised by the screener evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("requester is not authorized for this resource")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Evaluation(#[from] DecisionModelError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
