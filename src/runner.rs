use crate::dataset::Dataset;
use crate::questions;
use crate::types::*;
use log::{debug, warn};

/// Run every question in the plan against the loaded dataset
///
/// This is the main entry point for analysis execution.
/// The callback is invoked for each completed question, in plan order.
/// A question whose test cannot run records its error and the run continues.
pub fn run_analysis<F>(plan: &AnalysisPlan, data: &Dataset, mut on_outcome: F) -> Vec<QuestionOutcome>
where
    F: FnMut(&QuestionOutcome),
{
    debug!("Running {} questions over {} wines", plan.questions.len(), data.len());

    let mut outcomes = Vec::with_capacity(plan.questions.len());

    for &question in &plan.questions {
        let mut outcome = QuestionOutcome::new(question);

        if plan.output_mode.show_charts() {
            outcome.chart = Some(questions::build_chart(question, data, &plan.params));
        }

        if plan.output_mode.show_stats() {
            match questions::run_stats(question, data, &plan.params) {
                Ok(verdict) => {
                    debug!("{}: reject_null={}", question, verdict.reject_null);
                    outcome.verdict = Some(verdict);
                }
                Err(e) => {
                    warn!("{}", e);
                    outcome.error = Some(e);
                }
            }
        }

        on_outcome(&outcome); // Stream the outcome immediately
        outcomes.push(outcome);
    }

    outcomes
}

/// Verdicts from the outcomes that produced one
pub fn verdicts(outcomes: &[QuestionOutcome]) -> Vec<Verdict> {
    outcomes.iter().filter_map(|o| o.verdict.clone()).collect()
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;
