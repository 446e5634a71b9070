use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::super::decision::{ArtifactLocator, DecisionModelError, DecisionModelEvaluator};
use super::super::domain::{ApplicantInput, Benefit, Check, CheckKind, EvaluationResult};
use super::super::library::LibraryCheckProvider;
use super::config::EvaluationConfig;
use super::outcome::{CheckOutcome, IndeterminateCause};

/// Dispatches a single check to the library provider or the decision model.
pub struct CheckEvaluator {
    library: Arc<dyn LibraryCheckProvider>,
    models: Arc<dyn DecisionModelEvaluator>,
    locator: Arc<dyn ArtifactLocator>,
    config: EvaluationConfig,
}

impl CheckEvaluator {
    pub fn new(
        library: Arc<dyn LibraryCheckProvider>,
        models: Arc<dyn DecisionModelEvaluator>,
        locator: Arc<dyn ArtifactLocator>,
        config: EvaluationConfig,
    ) -> Self {
        Self {
            library,
            models,
            locator,
            config,
        }
    }

    /// Library failures come back as indeterminate outcomes; decision-model
    /// failures are returned as errors.
    pub async fn evaluate(
        &self,
        check: &Check,
        input: &ApplicantInput,
    ) -> Result<CheckOutcome, DecisionModelError> {
        match &check.kind {
            CheckKind::Library { evaluation_url } => {
                let call = self.library.evaluate_check(check, evaluation_url, input);
                Ok(self.bounded_library_call(call).await)
            }
            CheckKind::Custom => {
                let custom = input.custom_fields();
                let result = self
                    .evaluate_decision_model(&check.id, &check.name, &custom, &check.parameters)
                    .await?;
                Ok(CheckOutcome::Determined(result))
            }
        }
    }

    /// Single remote call for a public benefit, masked like a library check.
    pub async fn evaluate_public_benefit(
        &self,
        benefit: &Benefit,
        input: &ApplicantInput,
    ) -> CheckOutcome {
        let call = self.library.evaluate_benefit(benefit, input);
        self.bounded_library_call(call).await
    }

    /// Run the decision model stored for `check_id` with explicit inputs.
    pub async fn evaluate_decision_model(
        &self,
        check_id: &str,
        decision_name: &str,
        inputs: &Map<String, Value>,
        parameters: &Map<String, Value>,
    ) -> Result<EvaluationResult, DecisionModelError> {
        let model_path = self.locator.path_for_check(check_id);
        debug!(
            check_id,
            model_path = model_path.as_str(),
            decision_name,
            "evaluating decision model"
        );

        let budget = self.config.decision_timeout;
        let call = self
            .models
            .evaluate(&model_path, decision_name, inputs, parameters);
        match tokio::time::timeout(budget, call).await {
            Ok(result) => result,
            Err(_) => Err(DecisionModelError::Timeout(budget)),
        }
    }

    async fn bounded_library_call<F>(&self, call: F) -> CheckOutcome
    where
        F: std::future::Future<Output = CheckOutcome>,
    {
        tokio::time::timeout(self.config.library_timeout, call)
            .await
            .unwrap_or(CheckOutcome::Indeterminate(IndeterminateCause::Timeout))
    }
}
