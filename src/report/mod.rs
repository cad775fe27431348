//! Report generation module - Rendering verdicts and charts for people and tools.
//!
//! This module handles:
//! - Streaming each question's chart and verdict to the console
//! - Summaries across all questions
//! - Export to JSON and Markdown formats
//! - Simple (pipe-friendly) output format
//!
//! Low-level table and text rendering is handled by the console_format module,
//! chart drawing by the chart module.
//!
//! # Module Organization
//!
//! - `table` - Console output of outcomes and the summary table
//! - `export` - JSON and Markdown export
//! - `simple` - Verbal output format

mod export;
mod simple;
mod table;

// Re-export export functions
pub use export::{export_json_report, export_markdown_report};

// Re-export table functions
pub use table::{print_outcome, print_run_header, print_summary};

// Re-export simple output functions
pub use simple::print_simple_outcome;
