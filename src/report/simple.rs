//! Simple output format for verbal, pipe-friendly results.
//!
//! One block per question, no charts or tables. Used with the `--simple` flag.

use crate::console_format::format_p;
use crate::types::QuestionOutcome;

/// Format one outcome as plain lines
pub fn format_simple_outcome(outcome: &QuestionOutcome) -> String {
    let q = outcome.question.label();

    if let Some(ref error) = outcome.error {
        return format!("{}: ERROR - {}\n", q, error);
    }

    let Some(ref verdict) = outcome.verdict else {
        return format!("{}: no verdict\n", q);
    };

    let decision = if verdict.reject_null { "REJECT" } else { "FAIL TO REJECT" };
    let mut out = format!(
        "{}: {} H0 ({}, p={}, alpha={})\n",
        q,
        decision,
        verdict.test_name(),
        format_p(verdict.decision_p_value()),
        verdict.alpha
    );
    for line in verdict.finding.lines() {
        out.push_str("  ");
        out.push_str(line.trim());
        out.push('\n');
    }
    out
}

/// Print one outcome in the simple format
pub fn print_simple_outcome(outcome: &QuestionOutcome) {
    print!("{}", format_simple_outcome(outcome));
}
