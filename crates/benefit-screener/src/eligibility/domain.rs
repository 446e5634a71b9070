use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Leading character that marks a check as served by the remote library.
pub const LIBRARY_CHECK_PREFIX: char = 'L';

/// Three-valued verdict shared by checks and benefits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationResult {
    True,
    False,
    UnableToDetermine,
}

impl EvaluationResult {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationResult::True => "TRUE",
            EvaluationResult::False => "FALSE",
            EvaluationResult::UnableToDetermine => "UNABLE_TO_DETERMINE",
        }
    }

    /// Case-insensitive match against the three labels.
    pub fn from_label(value: &str) -> Option<Self> {
        [
            EvaluationResult::True,
            EvaluationResult::False,
            EvaluationResult::UnableToDetermine,
        ]
        .into_iter()
        .find(|candidate| candidate.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Check configuration as stored on a benefit definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckConfig {
    pub check_id: String,
    pub check_name: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_url: Option<String>,
}

/// Where a check is evaluated, decided once when the definition is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    Library { evaluation_url: String },
    Custom,
}

/// Rejected check or benefit definitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("check id must not be empty (check '{check_name}')")]
    EmptyCheckId { check_name: String },
    #[error("library check {check_id} has no evaluation url")]
    MissingEvaluationUrl { check_id: String },
}

/// Validated check ready for evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CheckConfig", into = "CheckConfig")]
pub struct Check {
    pub id: String,
    pub name: String,
    pub parameters: Map<String, Value>,
    pub kind: CheckKind,
}

impl Check {
    pub fn is_library(&self) -> bool {
        matches!(self.kind, CheckKind::Library { .. })
    }
}

/// Classification looks only at the first character of the id.
pub fn is_library_check_id(check_id: &str) -> bool {
    check_id.starts_with(LIBRARY_CHECK_PREFIX)
}

impl TryFrom<CheckConfig> for Check {
    type Error = ConfigurationError;

    fn try_from(config: CheckConfig) -> Result<Self, Self::Error> {
        let CheckConfig {
            check_id,
            check_name,
            parameters,
            evaluation_url,
        } = config;

        if check_id.is_empty() {
            return Err(ConfigurationError::EmptyCheckId { check_name });
        }

        let kind = if is_library_check_id(&check_id) {
            match evaluation_url.filter(|url| !url.trim().is_empty()) {
                Some(evaluation_url) => CheckKind::Library { evaluation_url },
                None => return Err(ConfigurationError::MissingEvaluationUrl { check_id }),
            }
        } else {
            CheckKind::Custom
        };

        Ok(Self {
            id: check_id,
            name: check_name,
            parameters,
            kind,
        })
    }
}

impl From<Check> for CheckConfig {
    fn from(check: Check) -> Self {
        let evaluation_url = match check.kind {
            CheckKind::Library { evaluation_url } => Some(evaluation_url),
            CheckKind::Custom => None,
        };
        Self {
            check_id: check.id,
            check_name: check.name,
            parameters: check.parameters,
            evaluation_url,
        }
    }
}

/// Named eligibility outcome composed of ordered checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benefit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub checks: Vec<Check>,
}

/// Owned collection of benefits evaluated together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screener {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub benefits: Vec<Benefit>,
}

impl Screener {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// Applicant answers. The optional `custom` object feeds custom checks only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom: Option<Map<String, Value>>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl ApplicantInput {
    pub fn new(fields: Map<String, Value>, custom: Option<Map<String, Value>>) -> Self {
        Self { custom, fields }
    }

    pub fn custom_fields(&self) -> Map<String, Value> {
        self.custom.clone().unwrap_or_default()
    }

    /// Full top-level mapping, `custom` included, as sent to the library.
    pub fn situation(&self) -> Value {
        let mut situation = self.fields.clone();
        if let Some(custom) = &self.custom {
            situation.insert("custom".to_string(), Value::Object(custom.clone()));
        }
        Value::Object(situation)
    }
}

/// Library check definition as published in the library schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityCheck {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub evaluation_url: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub input_definition: Option<Value>,
    #[serde(default)]
    pub parameter_definitions: Vec<Value>,
}
