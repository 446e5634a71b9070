use serde::{Deserialize, Serialize};

use super::domain::Screener;

/// Custom check definition owned by a screener author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCheckRecord {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

/// Read access to screener and check definitions.
pub trait ScreenerRepository: Send + Sync {
    /// Draft screener as edited by its owner.
    fn working_screener(&self, screener_id: &str) -> Result<Option<Screener>, RepositoryError>;
    fn published_screener(&self, screener_id: &str) -> Result<Option<Screener>, RepositoryError>;
    fn working_custom_check(
        &self,
        owner_id: &str,
        check_id: &str,
    ) -> Result<Option<CustomCheckRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored definition is invalid: {0}")]
    Corrupt(String),
}
