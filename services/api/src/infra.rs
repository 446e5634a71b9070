use benefit_screener::config::AppConfig;
use benefit_screener::error::AppError;
use benefit_screener::eligibility::{
    CheckEvaluator, CustomCheckRecord, EligibilityEngine, EvaluationConfig,
    HttpDecisionModelEvaluator, LibraryApiClient, LibraryCatalog, RepositoryError, Screener,
    ScreenerRepository, StorageArtifactLocator,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seed document for the in-memory store.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScreenerFixtures {
    #[serde(default)]
    pub(crate) working: Vec<Screener>,
    #[serde(default)]
    pub(crate) published: Vec<Screener>,
    #[serde(default)]
    pub(crate) custom_checks: Vec<CustomCheckRecord>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScreenerRepository {
    working: Arc<RwLock<HashMap<String, Screener>>>,
    published: Arc<RwLock<HashMap<String, Screener>>>,
    custom_checks: Arc<RwLock<Vec<CustomCheckRecord>>>,
}

impl InMemoryScreenerRepository {
    pub(crate) fn from_fixtures(fixtures: ScreenerFixtures) -> Self {
        let index = |screeners: Vec<Screener>| {
            screeners
                .into_iter()
                .map(|screener| (screener.id.clone(), screener))
                .collect::<HashMap<_, _>>()
        };

        Self {
            working: Arc::new(RwLock::new(index(fixtures.working))),
            published: Arc::new(RwLock::new(index(fixtures.published))),
            custom_checks: Arc::new(RwLock::new(fixtures.custom_checks)),
        }
    }

    /// Screener definitions are validated while the file is parsed.
    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let fixtures: ScreenerFixtures = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            working = fixtures.working.len(),
            published = fixtures.published.len(),
            custom_checks = fixtures.custom_checks.len(),
            "loaded screener fixtures"
        );
        Ok(Self::from_fixtures(fixtures))
    }
}

fn poisoned(store: &str) -> RepositoryError {
    RepositoryError::Unavailable(format!("{store} store lock poisoned"))
}

impl ScreenerRepository for InMemoryScreenerRepository {
    fn working_screener(&self, screener_id: &str) -> Result<Option<Screener>, RepositoryError> {
        let guard = self.working.read().map_err(|_| poisoned("working"))?;
        Ok(guard.get(screener_id).cloned())
    }

    fn published_screener(&self, screener_id: &str) -> Result<Option<Screener>, RepositoryError> {
        let guard = self.published.read().map_err(|_| poisoned("published"))?;
        Ok(guard.get(screener_id).cloned())
    }

    fn working_custom_check(
        &self,
        owner_id: &str,
        check_id: &str,
    ) -> Result<Option<CustomCheckRecord>, RepositoryError> {
        let guard = self.custom_checks.read().map_err(|_| poisoned("custom check"))?;
        Ok(guard
            .iter()
            .find(|check| check.owner_id == owner_id && check.id == check_id)
            .cloned())
    }
}

/// Wire the HTTP adapters named by the configuration into an engine.
pub(crate) fn build_engine(config: &AppConfig) -> Result<EligibilityEngine, AppError> {
    let library = LibraryApiClient::new(&config.library_api)?;
    let models = HttpDecisionModelEvaluator::new(&config.decision_engine)?;
    let locator = StorageArtifactLocator::new(config.storage.model_root.clone());

    Ok(EligibilityEngine::new(CheckEvaluator::new(
        Arc::new(library),
        Arc::new(models),
        Arc::new(locator),
        EvaluationConfig::from(config),
    )))
}

pub(crate) fn load_catalog(config: &AppConfig) -> Result<LibraryCatalog, AppError> {
    match &config.storage.library_schema_path {
        Some(path) => {
            let catalog = LibraryCatalog::from_path(path)?;
            info!(path = %path.display(), checks = catalog.all().len(), "loaded library catalog");
            Ok(catalog)
        }
        None => Ok(LibraryCatalog::default()),
    }
}

pub(crate) fn load_repository(config: &AppConfig) -> Result<InMemoryScreenerRepository, AppError> {
    match &config.storage.fixtures_path {
        Some(path) => InMemoryScreenerRepository::from_path(path),
        None => Ok(InMemoryScreenerRepository::default()),
    }
}
