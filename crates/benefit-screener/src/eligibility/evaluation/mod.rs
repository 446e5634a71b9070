mod check;
mod config;
mod outcome;
mod policy;

pub use check::CheckEvaluator;
pub use config::EvaluationConfig;
pub use outcome::{CheckOutcome, IndeterminateCause};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::decision::DecisionModelError;
use super::domain::{ApplicantInput, Benefit, EvaluationResult, Screener};
use policy::decide_benefit_result;

/// Request-scoped aggregator turning check outcomes into benefit verdicts.
pub struct EligibilityEngine {
    checks: CheckEvaluator,
}

impl EligibilityEngine {
    pub fn new(checks: CheckEvaluator) -> Self {
        Self { checks }
    }

    pub fn checks(&self) -> &CheckEvaluator {
        &self.checks
    }

    pub async fn evaluate_benefit(
        &self,
        benefit: &Benefit,
        input: &ApplicantInput,
    ) -> Result<BenefitVerdict, DecisionModelError> {
        if benefit.public {
            let outcome = self.checks.evaluate_public_benefit(benefit, input).await;
            debug!(
                benefit_id = benefit.id.as_str(),
                result = %outcome.result(),
                "public benefit evaluated"
            );
            return Ok(BenefitVerdict {
                name: benefit.name.clone(),
                result: outcome.result(),
                check_results: BTreeMap::new(),
            });
        }

        let mut results = Vec::with_capacity(benefit.checks.len());
        let mut check_results = BTreeMap::new();

        for (sequence, check) in benefit.checks.iter().enumerate() {
            let outcome = self.checks.evaluate(check, input).await?;
            results.push(outcome.result());
            check_results.insert(
                format!("{}{}", check.id, sequence),
                CheckVerdict {
                    name: check.name.clone(),
                    result: outcome.result(),
                    cause: outcome.cause().cloned(),
                },
            );
        }

        let result = decide_benefit_result(results);
        debug!(
            benefit_id = benefit.id.as_str(),
            %result,
            checks = check_results.len(),
            "benefit evaluated"
        );

        Ok(BenefitVerdict {
            name: benefit.name.clone(),
            result,
            check_results,
        })
    }

    /// Benefits are evaluated independently against the same input.
    pub async fn evaluate_screener(
        &self,
        screener: &Screener,
        input: &ApplicantInput,
    ) -> Result<ScreenerVerdict, DecisionModelError> {
        let mut verdict = ScreenerVerdict::new();
        for benefit in &screener.benefits {
            let benefit_verdict = self.evaluate_benefit(benefit, input).await?;
            verdict.insert(benefit.id.clone(), benefit_verdict);
        }

        info!(
            screener_id = screener.id.as_str(),
            benefits = verdict.len(),
            "screener evaluated"
        );
        Ok(verdict)
    }
}

/// Benefit id to verdict.
pub type ScreenerVerdict = BTreeMap<String, BenefitVerdict>;

/// Benefit-level verdict returned to the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitVerdict {
    pub name: String,
    pub result: EvaluationResult,
    pub check_results: BTreeMap<String, CheckVerdict>,
}

/// Per-check entry of a benefit verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckVerdict {
    pub name: String,
    pub result: EvaluationResult,
    #[serde(skip)]
    pub cause: Option<IndeterminateCause>,
}
