/// Configuration resolution module
///
/// This module handles:
/// - Locating and reading the optional TOML config file
/// - Merging file settings with CLI overrides
/// - Resolving the question list and output mode
/// - Building the immutable AnalysisPlan handed to the runner
use crate::cli::{self, CliArgs};
use crate::dataset::ColumnMap;
use crate::stats::LeveneCenter;
use crate::types::*;
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "WINE_EXPLORE_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG: &str = "wine-explore.toml";

/// Settings readable from the TOML config file. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub alpha: Option<f64>,
    pub top_split: Option<u32>,
    pub levene_center: Option<LeveneCenter>,
    #[serde(default)]
    pub columns: Option<ColumnMap>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid config: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::parse(&text).map_err(|e| format!("{} ({})", e, path.display()))
    }
}

/// Build a complete AnalysisPlan from CLI arguments
///
/// This resolves all configuration upfront, ensuring the runner receives
/// a fully validated, immutable plan.
pub fn build_analysis_plan(args: &CliArgs) -> Result<AnalysisPlan, String> {
    debug!("Building analysis plan from CLI args");

    // Step 1: Find and read the config file, if any
    let config_source = resolve_config_path(
        args.config.as_deref(),
        env::var(CONFIG_ENV).ok().as_deref(),
        Path::new(LOCAL_CONFIG),
        cli::default_config_path().as_deref(),
    )?;
    let file = match &config_source {
        Some(path) => {
            debug!("Using config file {:?}", path);
            FileConfig::load(path)?
        }
        None => FileConfig::default(),
    };

    // Step 2: Merge with CLI overrides
    let params = resolve_params(args, &file)?;
    debug!("alpha={} top_split={} levene_center={}", params.alpha, params.top_split, params.levene_center);

    // Step 3: Questions and outputs
    let questions = resolve_questions(&args.questions)?;
    let output_mode = if args.stats_only || args.simple {
        OutputMode::StatsOnly
    } else if args.charts_only {
        OutputMode::ChartsOnly
    } else {
        OutputMode::Both
    };

    Ok(AnalysisPlan {
        data_path: args.data.clone(),
        columns: file.columns.unwrap_or_default(),
        questions,
        params,
        output_mode,
        skip_invalid: args.skip_invalid,
        simple: args.simple,
        use_colors: !args.no_color && env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        json_path: args.json_output.clone(),
        markdown_path: args.markdown_output.clone(),
        config_source,
    })
}

/// Pick the config file to read
///
/// Order: explicit flag, environment variable, local file, user config dir.
/// Explicit and environment paths must exist; the other two are optional.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    from_env: Option<&str>,
    local: &Path,
    user: Option<&Path>,
) -> Result<Option<PathBuf>, String> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()));
        }
        return Ok(Some(path.to_path_buf()));
    }

    if let Some(value) = from_env
        && !value.is_empty()
    {
        let path = PathBuf::from(value);
        if !path.exists() {
            return Err(format!("Config file from {} not found: {}", CONFIG_ENV, path.display()));
        }
        return Ok(Some(path));
    }

    if local.exists() {
        return Ok(Some(local.to_path_buf()));
    }

    Ok(user.filter(|p| p.exists()).map(Path::to_path_buf))
}

/// CLI flags win over file values, which win over defaults
fn resolve_params(args: &CliArgs, file: &FileConfig) -> Result<StatsParams, String> {
    let defaults = StatsParams::default();

    let alpha = args.alpha.or(file.alpha).unwrap_or(defaults.alpha);
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(format!("alpha must be between 0 and 1 (exclusive), got {}", alpha));
    }

    let top_split = args.top_split.or(file.top_split).unwrap_or(defaults.top_split);
    if top_split == 0 {
        return Err("top_split must be at least 1".to_string());
    }

    let levene_center = match &args.levene_center {
        Some(s) => LeveneCenter::parse(s)?,
        None => file.levene_center.unwrap_or(defaults.levene_center),
    };

    Ok(StatsParams { alpha, top_split, levene_center })
}

/// Parse question names, keeping first-seen order and dropping duplicates
fn resolve_questions(names: &[String]) -> Result<Vec<Question>, String> {
    if names.is_empty() {
        return Ok(Question::all());
    }

    let mut questions = Vec::new();
    for name in names {
        let q = Question::parse(name)?;
        if !questions.contains(&q) {
            questions.push(q);
        }
    }
    Ok(questions)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
