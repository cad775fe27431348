//! Console output for analysis outcomes.
//!
//! Each question is printed as soon as it completes: heading, chart, verdict
//! and the numbers behind it.

use crate::chart::ChartWriter;
use crate::console_format::{self, TableWriter};
use crate::dataset::Dataset;
use crate::types::{AnalysisPlan, QuestionOutcome, Verdict};
use std::io::{self, Write};

/// Print what is about to be analysed
pub fn print_run_header(plan: &AnalysisPlan, data: &Dataset) {
    let reds = data.records.iter().filter(|w| w.red).count();
    println!("Analysing {} wines from {}", data.len(), plan.data_path.display());
    println!("  Red: {}   Other: {}", reds, data.len() - reds);
    if data.skipped_rows > 0 {
        println!("  Skipped rows: {}", data.skipped_rows);
    }
    println!(
        "  alpha = {}   top split = {}   Levene centre = {}",
        plan.params.alpha, plan.params.top_split, plan.params.levene_center
    );
    if let Some(ref path) = plan.config_source {
        println!("  config = {}", path.display());
    }
    println!();
}

/// Write one outcome: heading, chart, then verdict and details
pub fn write_outcome<W: Write>(
    writer: &mut W,
    outcome: &QuestionOutcome,
    top_split: u32,
    use_colors: bool,
    width: usize,
) -> io::Result<()> {
    {
        let mut table = TableWriter::new(&mut *writer, use_colors);
        table.write_question_heading(outcome.question.label(), &outcome.question.prompt(top_split))?;
    }
    writeln!(writer)?;

    if let Some(ref chart) = outcome.chart {
        let mut charts = ChartWriter::new(&mut *writer, use_colors, width);
        charts.write_chart(chart)?;
    }

    if let Some(ref verdict) = outcome.verdict {
        let mut table = TableWriter::new(&mut *writer, use_colors);
        table.write_verdict(verdict)?;
        table.write_verdict_details(verdict)?;
    }

    if let Some(ref error) = outcome.error {
        writeln!(writer, "Could not run the hypothesis test: {}", error)?;
        writeln!(writer)?;
    }

    Ok(())
}

/// Print one outcome to stdout
pub fn print_outcome(outcome: &QuestionOutcome, plan: &AnalysisPlan) {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    let _ = write_outcome(
        &mut lock,
        outcome,
        plan.params.top_split,
        plan.use_colors,
        console_format::get_console_width(),
    );
}

/// Print the summary table when more than one verdict was produced
pub fn print_summary(verdicts: &[Verdict], use_colors: bool) {
    if verdicts.len() > 1 {
        console_format::print_summary_table(verdicts, use_colors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Chart, Histogram, Series, Shade};
    use crate::types::Question;

    #[test]
    fn test_outcome_with_error_explains_failure() {
        let mut outcome = QuestionOutcome::new(Question::Q1);
        outcome.error = Some("Q1: Levene's test failed: need at least 2 observations, got 0".to_string());

        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome, 50, false, 100).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with("Q1 · Is the mean score of red wine greater"));
        assert!(out.contains("Could not run the hypothesis test: Q1: Levene's test failed"));
    }

    #[test]
    fn test_outcome_includes_chart() {
        let mut outcome = QuestionOutcome::new(Question::Q1);
        outcome.chart = Some(Chart::Histogram(Histogram::new(
            "Red wines have a higher average score than other wines",
            "score",
            vec![Series { label: "red".to_string(), shade: Shade::DarkRed, values: vec![92.0, 93.0] }],
            vec![],
        )));

        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome, 50, false, 100).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Red wines have a higher average score than other wines"));
        assert!(!out.contains("Null Hypothesis"));
    }
}
