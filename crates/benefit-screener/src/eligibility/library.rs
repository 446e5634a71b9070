//! Remote library API used for library checks and public benefits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, warn};

use super::domain::{ApplicantInput, Benefit, Check};
use super::evaluation::{CheckOutcome, IndeterminateCause};
use crate::config::RemoteEndpointConfig;

/// Remote evaluation provider. Implementations never fail; every problem is
/// reported as an indeterminate outcome.
#[async_trait]
pub trait LibraryCheckProvider: Send + Sync {
    async fn evaluate_check(
        &self,
        check: &Check,
        evaluation_url: &str,
        input: &ApplicantInput,
    ) -> CheckOutcome;

    async fn evaluate_benefit(&self, benefit: &Benefit, input: &ApplicantInput) -> CheckOutcome;
}

#[derive(Debug, Serialize)]
struct CheckEvaluationRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a Map<String, Value>>,
    situation: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckEvaluationResponse {
    check_result: Value,
}

/// HTTP client for the library API.
pub struct LibraryApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl LibraryApiClient {
    pub fn new(config: &RemoteEndpointConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("benefit-screener/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn endpoint(&self, relative: &str) -> String {
        if relative.starts_with('/') {
            format!("{}{}", self.base_url, relative)
        } else {
            format!("{}/{}", self.base_url, relative)
        }
    }

    async fn post(
        &self,
        subject: &str,
        url: &str,
        request: &CheckEvaluationRequest<'_>,
    ) -> CheckOutcome {
        let payload = serde_json::to_string(request).unwrap_or_default();

        let outcome = match self
            .http_client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.clone())
            .send()
            .await
        {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                match response.json::<CheckEvaluationResponse>().await {
                    Ok(body) => label_outcome(body.check_result),
                    Err(err) => CheckOutcome::Indeterminate(IndeterminateCause::MalformedResponse(
                        err.to_string(),
                    )),
                }
            }
            Ok(response) => {
                let status = response.status().as_u16();
                CheckOutcome::Indeterminate(IndeterminateCause::Status(status))
            }
            Err(err) if err.is_timeout() => {
                CheckOutcome::Indeterminate(IndeterminateCause::Timeout)
            }
            Err(err) => {
                CheckOutcome::Indeterminate(IndeterminateCause::Transport(err.to_string()))
            }
        };

        match outcome.cause() {
            Some(IndeterminateCause::UnrecognizedLabel(label)) => {
                warn!(
                    subject,
                    url,
                    label = label.as_str(),
                    "library returned an unknown result label"
                );
            }
            Some(cause) => {
                error!(
                    subject,
                    url,
                    %cause,
                    payload = payload.as_str(),
                    "library evaluation failed"
                );
            }
            None => {}
        }

        outcome
    }
}

fn label_outcome(check_result: Value) -> CheckOutcome {
    match check_result {
        Value::String(label) => CheckOutcome::from_label(&label),
        Value::Bool(flag) => CheckOutcome::from_label(if flag { "TRUE" } else { "FALSE" }),
        Value::Null => CheckOutcome::Indeterminate(IndeterminateCause::MalformedResponse(
            "checkResult is null".to_string(),
        )),
        other => CheckOutcome::from_label(&other.to_string()),
    }
}

#[async_trait]
impl LibraryCheckProvider for LibraryApiClient {
    async fn evaluate_check(
        &self,
        check: &Check,
        evaluation_url: &str,
        input: &ApplicantInput,
    ) -> CheckOutcome {
        let request = CheckEvaluationRequest {
            parameters: Some(&check.parameters),
            situation: input.situation(),
        };
        self.post(&check.id, &self.endpoint(evaluation_url), &request)
            .await
    }

    async fn evaluate_benefit(&self, benefit: &Benefit, input: &ApplicantInput) -> CheckOutcome {
        let request = CheckEvaluationRequest {
            parameters: None,
            situation: input.situation(),
        };
        let url = self.endpoint(&format!("/benefits/{}/evaluate", benefit.id));
        self.post(&benefit.id, &url, &request).await
    }
}
