use std::path::Path;

use super::domain::EligibilityCheck;

/// Failure loading the library schema document.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read library schema: {0}")]
    Io(#[from] std::io::Error),
    #[error("library schema is not a valid check list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Published library check definitions, kept in document order.
#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
    checks: Vec<EligibilityCheck>,
}

impl LibraryCatalog {
    pub fn new(checks: Vec<EligibilityCheck>) -> Self {
        Self { checks }
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn all(&self) -> &[EligibilityCheck] {
        &self.checks
    }

    pub fn by_module(&self, module: &str) -> Vec<&EligibilityCheck> {
        self.checks
            .iter()
            .filter(|check| check.module.as_deref() == Some(module))
            .collect()
    }

    /// First definition carrying `id`.
    pub fn by_id(&self, id: &str) -> Option<&EligibilityCheck> {
        self.checks.iter().find(|check| check.id == id)
    }
}
