/// Core data structures for analysis runs
///
/// This module defines the research questions, the resolved analysis plan,
/// and the verdict produced for each question.
use crate::chart::Chart;
use crate::dataset::ColumnMap;
use crate::stats::{LeveneCenter, LeveneResult, SpearmanResult, TTestResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The three fixed research questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Question {
    /// Do red wines score higher on average than other wines?
    Q1,
    /// Are price and score related?
    Q2,
    /// Do top-50 wines score higher on average than the bottom 50?
    Q3,
}

impl Question {
    pub fn all() -> Vec<Question> {
        vec![Question::Q1, Question::Q2, Question::Q3]
    }

    /// Accepts "q1", "Q1" or "1"
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().trim_start_matches('q') {
            "1" => Ok(Question::Q1),
            "2" => Ok(Question::Q2),
            "3" => Ok(Question::Q3),
            _ => Err(format!("Unknown question '{}': expected q1, q2 or q3", s)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Question::Q1 => "Q1",
            Question::Q2 => "Q2",
            Question::Q3 => "Q3",
        }
    }

    /// The question in plain words
    pub fn prompt(&self, top_split: u32) -> String {
        match self {
            Question::Q1 => "Is the mean score of red wine greater than that of all other wines?".to_string(),
            Question::Q2 => "Is there a relationship between a wine's price and its score?".to_string(),
            Question::Q3 => format!("Do wines ranked in the top {} score higher on average?", top_split),
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parameters shared by every hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsParams {
    /// Significance level
    pub alpha: f64,
    /// Ranks <= this are "top", the rest "bottom"
    pub top_split: u32,
    pub levene_center: LeveneCenter,
}

impl Default for StatsParams {
    fn default() -> Self {
        Self { alpha: 0.05, top_split: 50, levene_center: LeveneCenter::Median }
    }
}

/// Which outputs to produce for each question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    Both,
    StatsOnly,
    ChartsOnly,
}

impl OutputMode {
    pub fn show_stats(&self) -> bool {
        !matches!(self, OutputMode::ChartsOnly)
    }

    pub fn show_charts(&self) -> bool {
        !matches!(self, OutputMode::StatsOnly)
    }
}

/// Fully resolved, immutable description of one run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPlan {
    pub data_path: PathBuf,
    pub columns: ColumnMap,
    pub questions: Vec<Question>,
    pub params: StatsParams,
    pub output_mode: OutputMode,
    pub skip_invalid: bool,
    pub simple: bool,
    pub use_colors: bool,
    pub json_path: Option<PathBuf>,
    pub markdown_path: Option<PathBuf>,
    /// Config file the settings came from, if any
    pub config_source: Option<PathBuf>,
}

/// Size and mean of one compared group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub n: usize,
    pub mean: f64,
}

/// Outcome of one research question's hypothesis test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub question: Question,
    pub reject_null: bool,
    /// The finding sentence(s) printed under the decision line
    pub finding: String,
    pub alpha: f64,
    pub groups: Vec<GroupSummary>,
    pub levene: Option<LeveneResult>,
    pub ttest: Option<TTestResult>,
    pub spearman: Option<SpearmanResult>,
}

impl Verdict {
    pub fn decision(&self) -> &'static str {
        if self.reject_null { "Reject the Null Hypothesis." } else { "Fail to reject the Null Hypothesis." }
    }

    /// Short name of the deciding test
    pub fn test_name(&self) -> String {
        match (&self.ttest, &self.spearman) {
            (Some(t), _) if t.equal_var => "Student t (one-sided)".to_string(),
            (Some(_), _) => "Welch t (one-sided)".to_string(),
            (None, Some(_)) => "Spearman".to_string(),
            (None, None) => "-".to_string(),
        }
    }

    /// Statistic of the deciding test
    pub fn statistic(&self) -> f64 {
        self.ttest.map(|t| t.statistic).or(self.spearman.map(|s| s.rho)).unwrap_or(f64::NAN)
    }

    /// p-value the decision was made against
    pub fn decision_p_value(&self) -> f64 {
        self.ttest.map(|t| t.half_p()).or(self.spearman.map(|s| s.p_value)).unwrap_or(f64::NAN)
    }
}

/// Everything produced for one question in a run
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionOutcome {
    pub question: Question,
    pub verdict: Option<Verdict>,
    pub chart: Option<Chart>,
    /// Set when the hypothesis test could not be run
    pub error: Option<String>,
}

impl QuestionOutcome {
    pub fn new(question: Question) -> Self {
        Self { question, verdict: None, chart: None, error: None }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}
