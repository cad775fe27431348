use clap::Parser;
use std::path::PathBuf;

/// Get the default config file location for wine-explore
/// Uses platform-specific config directories:
/// - Linux: ~/.config/wine-explore/config.toml
/// - macOS: ~/Library/Application Support/wine-explore/config.toml
/// - Windows: %APPDATA%/wine-explore/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wine-explore").join("config.toml"))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "wine-explore")]
#[command(about = "Explore wine ratings: score, price, color and Top 100 rank")]
#[command(version)]
pub struct CliArgs {
    /// Cleaned wine dataset (CSV with a header row)
    #[arg(long, short = 'd', value_name = "CSV")]
    pub data: PathBuf,

    /// Research questions to run (q1, q2, q3). Default: all three
    /// Can specify multiple: --question q1 q3
    #[arg(long = "question", short = 'q', value_name = "Q", num_args = 1..)]
    pub questions: Vec<String>,

    /// Only run the hypothesis tests (no charts)
    #[arg(long)]
    pub stats_only: bool,

    /// Only draw the charts (no hypothesis tests)
    #[arg(long)]
    pub charts_only: bool,

    /// Significance level (overrides the config file; default 0.05)
    #[arg(long, value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Ranks at or below this count as "top" in Q3 (default 50)
    #[arg(long, value_name = "RANK")]
    pub top_split: Option<u32>,

    /// Centre used by Levene's test: "median" (Brown-Forsythe) or "mean"
    #[arg(long, value_name = "CENTER")]
    pub levene_center: Option<String>,

    /// TOML config file with alpha, top_split, levene_center and [columns]
    /// Default: $WINE_EXPLORE_CONFIG, ./wine-explore.toml, then the platform config dir
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip rows that fail to parse instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,

    /// Write a JSON report to this path
    #[arg(long = "json", value_name = "PATH")]
    pub json_output: Option<PathBuf>,

    /// Write a Markdown report to this path
    #[arg(long = "markdown", value_name = "PATH")]
    pub markdown_output: Option<PathBuf>,

    /// Use simple, verbal output format instead of charts and tables
    /// Better for piping into other tools.
    #[arg(long)]
    pub simple: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Override console width for testing (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();

        // Split questions on whitespace and commas to support quoted lists like 'q1,q3'
        args.questions = args
            .questions
            .iter()
            .flat_map(|s| s.split(|c: char| c.is_whitespace() || c == ',').map(|q| q.to_string()))
            .filter(|q| !q.is_empty())
            .collect();

        args
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.stats_only && self.charts_only {
            return Err("Cannot specify both --stats-only and --charts-only".to_string());
        }

        if let Some(alpha) = self.alpha
            && !(alpha > 0.0 && alpha < 1.0)
        {
            return Err(format!("--alpha must be between 0 and 1 (exclusive), got {}", alpha));
        }

        if self.top_split == Some(0) {
            return Err("--top-split must be at least 1".to_string());
        }

        if self.simple && self.charts_only {
            return Err("--simple prints verdicts only and cannot be combined with --charts-only".to_string());
        }

        if !self.data.exists() {
            return Err(format!("Dataset not found: {}", self.data.display()));
        }

        Ok(())
    }
}
