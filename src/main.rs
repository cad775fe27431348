// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod chart;
mod cli;
mod config;
mod console_format;
mod dataset;
mod questions;
mod report;
mod runner;
mod stats;
mod types;
mod ui;

use dataset::Dataset;
use types::*;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();
    ui::set_colors(!args.no_color && std::env::var_os("NO_COLOR").is_none());

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    // Build analysis plan
    let plan = match config::build_analysis_plan(&args) {
        Ok(p) => p,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };

    ui::set_colors(plan.use_colors);

    // Load the dataset
    let data = match Dataset::load(&plan.data_path, &plan.columns, plan.skip_invalid) {
        Ok(d) => d,
        Err(e) => {
            ui::print_error(&format!("Failed to load dataset: {}", e));
            std::process::exit(1);
        }
    };

    if data.is_empty() {
        ui::print_error(&format!("Dataset {} contains no wines", plan.data_path.display()));
        std::process::exit(1);
    }

    if !plan.simple {
        report::print_run_header(&plan, &data);
    } else if data.skipped_rows > 0 {
        ui::print_warning(&format!("skipped {} invalid rows", data.skipped_rows));
    }

    // Run questions with streaming output
    let outcomes = runner::run_analysis(&plan, &data, |outcome| {
        if plan.simple {
            report::print_simple_outcome(outcome);
        } else {
            report::print_outcome(outcome, &plan);
        }
    });

    if !plan.simple {
        report::print_summary(&runner::verdicts(&outcomes), plan.use_colors);
    }

    // Generate file reports (JSON, markdown)
    generate_file_reports(&plan, &data, &outcomes);

    // Determine exit code
    let exit_code = if outcomes.iter().any(QuestionOutcome::failed) { 1 } else { 0 };
    std::process::exit(exit_code);
}

/// Write the JSON and Markdown reports requested on the command line
fn generate_file_reports(plan: &AnalysisPlan, data: &Dataset, outcomes: &[QuestionOutcome]) {
    if let Some(ref path) = plan.json_path {
        match report::export_json_report(plan, data, outcomes, path) {
            Ok(_) => ui::status(&format!("JSON report saved to: {}", path.display())),
            Err(e) => ui::print_warning(&format!("Failed to save JSON report: {}", e)),
        }
    }

    if let Some(ref path) = plan.markdown_path {
        match report::export_markdown_report(plan, data, outcomes, path) {
            Ok(_) => ui::status(&format!("Markdown report saved to: {}", path.display())),
            Err(e) => ui::print_warning(&format!("Failed to save markdown report: {}", e)),
        }
    }
}
