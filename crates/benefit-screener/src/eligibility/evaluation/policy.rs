use super::super::domain::EvaluationResult;

/// Reduce per-check results to one benefit result.
///
/// All `TRUE` (including none at all) yields `TRUE`; otherwise any `FALSE`
/// yields `FALSE`; otherwise the benefit is `UNABLE_TO_DETERMINE`.
pub(crate) fn decide_benefit_result<I>(results: I) -> EvaluationResult
where
    I: IntoIterator<Item = EvaluationResult>,
{
    let mut all_true = true;
    let mut any_false = false;

    for result in results {
        match result {
            EvaluationResult::True => {}
            EvaluationResult::False => {
                all_true = false;
                any_false = true;
            }
            EvaluationResult::UnableToDetermine => all_true = false,
        }
    }

    if all_true {
        EvaluationResult::True
    } else if any_false {
        EvaluationResult::False
    } else {
        EvaluationResult::UnableToDetermine
    }
}
