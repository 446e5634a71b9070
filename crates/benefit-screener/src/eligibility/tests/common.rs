use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Map, Value};

use crate::eligibility::decision::{
    DecisionModelError, DecisionModelEvaluator, StorageArtifactLocator,
};
use crate::eligibility::domain::{
    ApplicantInput, Benefit, Check, CheckKind, EvaluationResult, Screener,
};
use crate::eligibility::evaluation::{
    CheckEvaluator, CheckOutcome, EligibilityEngine, EvaluationConfig,
};
use crate::eligibility::library::LibraryCheckProvider;
use crate::eligibility::repository::{CustomCheckRecord, RepositoryError, ScreenerRepository};
use crate::eligibility::{LibraryCatalog, ScreenerEvaluationService};

pub(super) const OWNER: &str = "owner-1";

pub(super) fn custom_check(id: &str, decision_name: &str) -> Check {
    Check {
        id: id.to_string(),
        name: decision_name.to_string(),
        parameters: Map::new(),
        kind: CheckKind::Custom,
    }
}

pub(super) fn library_check(id: &str, evaluation_url: &str) -> Check {
    Check {
        id: id.to_string(),
        name: format!("library {id}"),
        parameters: object(json!({ "threshold": 65 })),
        kind: CheckKind::Library {
            evaluation_url: evaluation_url.to_string(),
        },
    }
}

/// Custom checks named after the result the scripted model returns.
pub(super) fn benefit_with(id: &str, results: &[EvaluationResult]) -> Benefit {
    Benefit {
        id: id.to_string(),
        name: format!("Benefit {id}"),
        public: false,
        checks: results
            .iter()
            .enumerate()
            .map(|(index, result)| custom_check(&format!("C{index}"), result.label()))
            .collect(),
    }
}

pub(super) fn public_benefit(id: &str) -> Benefit {
    Benefit {
        id: id.to_string(),
        name: format!("Public {id}"),
        public: true,
        checks: vec![library_check("L-ignored", "/ignored")],
    }
}

pub(super) fn screener(id: &str, benefits: Vec<Benefit>) -> Screener {
    Screener {
        id: id.to_string(),
        owner_id: OWNER.to_string(),
        benefits,
    }
}

pub(super) fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

pub(super) fn applicant() -> ApplicantInput {
    serde_json::from_value(json!({
        "age": 67,
        "state": "IA",
        "custom": { "householdSize": 3, "monthlyIncome": 1800 }
    }))
    .expect("applicant input")
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct ModelCall {
    pub(super) model_path: String,
    pub(super) decision_name: String,
    pub(super) inputs: Map<String, Value>,
    pub(super) parameters: Map<String, Value>,
}

/// Answers with the decision name parsed as a result label; anything else is
/// an unknown decision.
#[derive(Default)]
pub(super) struct ScriptedModels {
    pub(super) calls: Mutex<Vec<ModelCall>>,
    pub(super) delay: Option<Duration>,
}

impl ScriptedModels {
    pub(super) fn calls(&self) -> Vec<ModelCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl DecisionModelEvaluator for ScriptedModels {
    async fn evaluate(
        &self,
        model_path: &str,
        decision_name: &str,
        inputs: &Map<String, Value>,
        parameters: &Map<String, Value>,
    ) -> Result<EvaluationResult, DecisionModelError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(ModelCall {
                model_path: model_path.to_string(),
                decision_name: decision_name.to_string(),
                inputs: inputs.clone(),
                parameters: parameters.clone(),
            });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        EvaluationResult::from_label(decision_name).ok_or_else(|| {
            DecisionModelError::UnknownDecision {
                model_path: model_path.to_string(),
                decision_name: decision_name.to_string(),
            }
        })
    }
}

/// Library double returning scripted outcomes keyed by check or benefit id.
#[derive(Default)]
pub(super) struct ScriptedLibrary {
    pub(super) outcomes: HashMap<String, CheckOutcome>,
    pub(super) situations: Mutex<Vec<(String, String, Value)>>,
    pub(super) delay: Option<Duration>,
}

impl ScriptedLibrary {
    pub(super) fn with(outcomes: &[(&str, CheckOutcome)]) -> Self {
        Self {
            outcomes: outcomes
                .iter()
                .map(|(id, outcome)| (id.to_string(), outcome.clone()))
                .collect(),
            ..Self::default()
        }
    }

    /// Recorded `(subject, url, situation)` triples.
    pub(super) fn calls(&self) -> Vec<(String, String, Value)> {
        self.situations
            .lock()
            .expect("situations mutex poisoned")
            .clone()
    }

    async fn answer(&self, subject: &str, url: &str, input: &ApplicantInput) -> CheckOutcome {
        self.situations
            .lock()
            .expect("situations mutex poisoned")
            .push((subject.to_string(), url.to_string(), input.situation()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.outcomes
            .get(subject)
            .cloned()
            .unwrap_or(CheckOutcome::Determined(EvaluationResult::True))
    }
}

#[async_trait]
impl LibraryCheckProvider for ScriptedLibrary {
    async fn evaluate_check(
        &self,
        check: &Check,
        evaluation_url: &str,
        input: &ApplicantInput,
    ) -> CheckOutcome {
        self.answer(&check.id, evaluation_url, input).await
    }

    async fn evaluate_benefit(&self, benefit: &Benefit, input: &ApplicantInput) -> CheckOutcome {
        self.answer(&benefit.id, "benefit", input).await
    }
}

pub(super) fn evaluator(
    library: Arc<ScriptedLibrary>,
    models: Arc<ScriptedModels>,
    config: EvaluationConfig,
) -> CheckEvaluator {
    CheckEvaluator::new(
        library,
        models,
        Arc::new(StorageArtifactLocator::new("models")),
        config,
    )
}

pub(super) fn engine(
    library: Arc<ScriptedLibrary>,
    models: Arc<ScriptedModels>,
) -> EligibilityEngine {
    EligibilityEngine::new(evaluator(library, models, EvaluationConfig::default()))
}

pub(super) fn default_engine() -> EligibilityEngine {
    engine(
        Arc::new(ScriptedLibrary::default()),
        Arc::new(ScriptedModels::default()),
    )
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) working: Mutex<HashMap<String, Screener>>,
    pub(super) published: Mutex<HashMap<String, Screener>>,
    pub(super) custom_checks: Mutex<Vec<CustomCheckRecord>>,
}

impl MemoryRepository {
    pub(super) fn with_working(self, screener: Screener) -> Self {
        self.working
            .lock()
            .expect("repository mutex poisoned")
            .insert(screener.id.clone(), screener);
        self
    }

    pub(super) fn with_published(self, screener: Screener) -> Self {
        self.published
            .lock()
            .expect("repository mutex poisoned")
            .insert(screener.id.clone(), screener);
        self
    }

    pub(super) fn with_custom_check(self, id: &str, owner_id: &str) -> Self {
        self.custom_checks
            .lock()
            .expect("repository mutex poisoned")
            .push(CustomCheckRecord {
                id: id.to_string(),
                name: format!("check {id}"),
                owner_id: owner_id.to_string(),
            });
        self
    }
}

impl ScreenerRepository for MemoryRepository {
    fn working_screener(&self, screener_id: &str) -> Result<Option<Screener>, RepositoryError> {
        let guard = self.working.lock().expect("repository mutex poisoned");
        Ok(guard.get(screener_id).cloned())
    }

    fn published_screener(&self, screener_id: &str) -> Result<Option<Screener>, RepositoryError> {
        let guard = self.published.lock().expect("repository mutex poisoned");
        Ok(guard.get(screener_id).cloned())
    }

    fn working_custom_check(
        &self,
        owner_id: &str,
        check_id: &str,
    ) -> Result<Option<CustomCheckRecord>, RepositoryError> {
        let guard = self.custom_checks.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|check| check.owner_id == owner_id && check.id == check_id)
            .cloned())
    }
}

pub(super) struct UnavailableRepository;

impl ScreenerRepository for UnavailableRepository {
    fn working_screener(&self, _screener_id: &str) -> Result<Option<Screener>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn published_screener(&self, _screener_id: &str) -> Result<Option<Screener>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn working_custom_check(
        &self,
        _owner_id: &str,
        _check_id: &str,
    ) -> Result<Option<CustomCheckRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service<R>(repository: R) -> Arc<ScreenerEvaluationService<R>>
where
    R: ScreenerRepository + 'static,
{
    Arc::new(ScreenerEvaluationService::new(
        Arc::new(repository),
        default_engine(),
        catalog(),
    ))
}

pub(super) fn catalog() -> LibraryCatalog {
    LibraryCatalog::from_json(
        r#"[
            {"id": "L-age", "name": "Age over threshold", "module": "demographics", "evaluationUrl": "/api/v1/demographics/age"},
            {"id": "L-income", "name": "Income under limit", "module": "income", "evaluationUrl": "/api/v1/income/limit"}
        ]"#,
    )
    .expect("catalog parses")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
