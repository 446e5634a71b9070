use crate::infra::build_engine;
use benefit_screener::config::AppConfig;
use benefit_screener::eligibility::{ApplicantInput, EligibilityEngine, Screener, ScreenerVerdict};
use benefit_screener::error::AppError;
use benefit_screener::telemetry;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Path to a screener definition (JSON)
    #[arg(long)]
    pub(crate) screener: PathBuf,
    /// Path to the applicant input document (JSON)
    #[arg(long)]
    pub(crate) input: PathBuf,
}

pub(crate) async fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let engine = build_engine(&config)?;
    let screener: Screener = read_json(&args.screener)?;
    let input: ApplicantInput = read_json(&args.input)?;

    let verdict = evaluate_files(&engine, &screener, &input).await?;
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

pub(crate) async fn evaluate_files(
    engine: &EligibilityEngine,
    screener: &Screener,
    input: &ApplicantInput,
) -> Result<ScreenerVerdict, AppError> {
    Ok(engine.evaluate_screener(screener, input).await?)
}

fn read_json<T>(path: &Path) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use benefit_screener::config::RemoteEndpointConfig;
    use benefit_screener::eligibility::{
        CheckEvaluator, EvaluationConfig, EvaluationResult, HttpDecisionModelEvaluator,
        LibraryApiClient, StorageArtifactLocator,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn offline_engine() -> EligibilityEngine {
        let endpoint = RemoteEndpointConfig::new("http://127.0.0.1:9", Duration::from_millis(200));
        EligibilityEngine::new(CheckEvaluator::new(
            Arc::new(LibraryApiClient::new(&endpoint).expect("library client")),
            Arc::new(HttpDecisionModelEvaluator::new(&endpoint).expect("engine client")),
            Arc::new(StorageArtifactLocator::new("models")),
            EvaluationConfig::default(),
        ))
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_json::<Screener>(Path::new("does/not/exist.json")).expect_err("no file");
        assert!(matches!(err, AppError::Io(_)));
    }

    #[tokio::test]
    async fn unreachable_library_yields_unable_to_determine() {
        let screener: Screener = serde_json::from_value(json!({
            "id": "s",
            "ownerId": "o",
            "benefits": [
                { "id": "b", "name": "B", "checks": [
                    { "checkId": "L-age", "checkName": "Age", "parameters": {},
                      "evaluationUrl": "/api/v1/age" }
                ] },
                { "id": "empty", "name": "Empty", "checks": [] }
            ]
        }))
        .expect("screener parses");
        let input: ApplicantInput = serde_json::from_value(json!({ "age": 40 })).expect("input");

        let verdict = evaluate_files(&offline_engine(), &screener, &input)
            .await
            .expect("library failures are masked");

        assert_eq!(verdict["b"].result, EvaluationResult::UnableToDetermine);
        assert_eq!(verdict["empty"].result, EvaluationResult::True);
    }
}
