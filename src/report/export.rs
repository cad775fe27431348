//! Report export functions for JSON and Markdown formats.
//!
//! This module handles exporting analysis results to files for storage and
//! sharing. Charts are exported as plain text inside code blocks.

use crate::chart;
use crate::console_format::{TableWriter, format_p, format_stat};
use crate::dataset::Dataset;
use crate::types::{AnalysisPlan, QuestionOutcome, Verdict};
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Chart width used in exported files
const EXPORT_WIDTH: usize = 100;

/// Build the JSON report value
///
/// Includes generation time, dataset summary, parameters, every verdict and
/// any per-question errors.
pub fn build_json_report(plan: &AnalysisPlan, data: &Dataset, outcomes: &[QuestionOutcome]) -> serde_json::Value {
    let verdicts: Vec<&Verdict> = outcomes.iter().filter_map(|o| o.verdict.as_ref()).collect();
    let errors: Vec<serde_json::Value> = outcomes
        .iter()
        .filter_map(|o| o.error.as_ref().map(|e| json!({ "question": o.question, "error": e })))
        .collect();

    json!({
        "generated_at": chrono::Local::now().to_rfc3339(),
        "dataset": {
            "path": plan.data_path.display().to_string(),
            "wines": data.len(),
            "red": data.records.iter().filter(|w| w.red).count(),
            "skipped_rows": data.skipped_rows,
        },
        "params": plan.params,
        "questions": plan.questions,
        "verdicts": verdicts,
        "errors": errors,
    })
}

/// Export results as JSON.
pub fn export_json_report(
    plan: &AnalysisPlan,
    data: &Dataset,
    outcomes: &[QuestionOutcome],
    output_path: &Path,
) -> std::io::Result<()> {
    let report = build_json_report(plan, data, outcomes);
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &report)?;
    Ok(())
}

/// Format results as a Markdown document.
///
/// Creates a Markdown report that includes:
/// - Header with dataset info and parameters
/// - One section per question with its chart and verdict
/// - Summary table
pub fn format_markdown_report(plan: &AnalysisPlan, data: &Dataset, outcomes: &[QuestionOutcome]) -> std::io::Result<String> {
    let mut out: Vec<u8> = Vec::new();

    writeln!(out, "# Wine Exploration Report\n")?;
    writeln!(out, "**Dataset**: {} ({} wines)", plan.data_path.display(), data.len())?;
    writeln!(out, "**Generated**: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(
        out,
        "**Parameters**: alpha = {}, top split = {}, Levene centre = {}\n",
        plan.params.alpha, plan.params.top_split, plan.params.levene_center
    )?;

    for outcome in outcomes {
        writeln!(out, "## {} · {}\n", outcome.question.label(), outcome.question.prompt(plan.params.top_split))?;

        if let Some(ref c) = outcome.chart {
            writeln!(out, "```")?;
            write!(out, "{}", chart::render_plain(c, EXPORT_WIDTH))?;
            writeln!(out, "```\n")?;
        }

        if let Some(ref v) = outcome.verdict {
            writeln!(out, "**{}**\n", v.decision())?;
            for line in v.finding.lines() {
                writeln!(out, "{}  ", line.trim())?;
            }
            writeln!(out)?;
            writeln!(out, "```")?;
            let mut table = TableWriter::new(&mut out, false); // No colors for markdown
            table.write_verdict_details(v)?;
            writeln!(out, "```\n")?;
        }

        if let Some(ref e) = outcome.error {
            writeln!(out, "> Could not run the hypothesis test: {}\n", e)?;
        }
    }

    let verdicts: Vec<&Verdict> = outcomes.iter().filter_map(|o| o.verdict.as_ref()).collect();
    if !verdicts.is_empty() {
        writeln!(out, "## Summary\n")?;
        writeln!(out, "| Question | Test | Statistic | p-value | Decision |")?;
        writeln!(out, "|---|---|---|---|---|")?;
        for v in verdicts {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                v.question.label(),
                v.test_name(),
                format_stat(v.statistic()),
                format_p(v.decision_p_value()),
                if v.reject_null { "reject H0" } else { "fail to reject" }
            )?;
        }
        writeln!(out)?;
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Export results as Markdown.
pub fn export_markdown_report(
    plan: &AnalysisPlan,
    data: &Dataset,
    outcomes: &[QuestionOutcome],
    output_path: &Path,
) -> std::io::Result<()> {
    let text = format_markdown_report(plan, data, outcomes)?;
    let mut file = File::create(output_path)?;
    file.write_all(text.as_bytes())
}
