//! Eligibility screening: checks, benefit aggregation, and the HTTP boundary.
//!
//! A screener is a list of benefits; a benefit is either evaluated remotely as
//! a whole (public) or by running each of its checks and reducing the
//! three-valued results. Library checks go to the remote library API and never
//! fail; custom checks run a decision model and propagate its errors.

pub mod catalog;
pub mod decision;
pub mod domain;
pub mod evaluation;
pub mod library;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, LibraryCatalog};
pub use decision::{
    ArtifactLocator, DecisionModelError, DecisionModelEvaluator, HttpDecisionModelEvaluator,
    StorageArtifactLocator,
};
pub use domain::{
    ApplicantInput, Benefit, Check, CheckConfig, CheckKind, ConfigurationError, EligibilityCheck,
    EvaluationResult, Screener,
};
pub use evaluation::{
    BenefitVerdict, CheckEvaluator, CheckOutcome, CheckVerdict, EligibilityEngine,
    EvaluationConfig, IndeterminateCause, ScreenerVerdict,
};
pub use library::{LibraryApiClient, LibraryCheckProvider};
pub use repository::{CustomCheckRecord, RepositoryError, ScreenerRepository};
pub use router::{screener_router, REQUESTER_HEADER};
pub use service::{EvaluateCheckRequest, ScreenerEvaluationService, ScreenerServiceError};
