//! The three research questions.
//!
//! Each question has a `*_stats` function that runs its hypothesis test and
//! returns a `Verdict`, and a `*_viz` function that builds the chart for it.
//! All six take the same dataset and share no state.

use crate::chart::{BoxPlot, BoxRow, Chart, FiveNumber, HRule, Histogram, Point, Scatter, Series, Shade, mean_marker};
use crate::dataset::Dataset;
use crate::stats::{self, LeveneResult, TTestResult};
use crate::types::{GroupSummary, Question, StatsParams, Verdict};
use log::debug;
use std::collections::BTreeMap;

/// Levene first, then a pooled or Welch t-test depending on whether equal
/// variances survive at `alpha`. A NaN Levene p-value selects Welch.
fn compare_means(a: &[f64], b: &[f64], params: &StatsParams) -> Result<(LeveneResult, TTestResult), String> {
    let levene = stats::levene(a, b, params.levene_center).map_err(|e| format!("Levene's test failed: {}", e))?;
    let equal_var = levene.p_value > params.alpha;
    debug!("Levene W={:.4} p={:.4} -> equal_var={}", levene.statistic, levene.p_value, equal_var);

    let ttest = stats::ttest_ind(a, b, equal_var).map_err(|e| format!("t-test failed: {}", e))?;
    debug!("t={:.4} p={:.4} df={:.2}", ttest.statistic, ttest.p_value, ttest.df);
    Ok((levene, ttest))
}

/// One-sided "first group is greater" decision
fn greater_rejects(ttest: &TTestResult, alpha: f64) -> bool {
    ttest.statistic > 0.0 && ttest.half_p() < alpha
}

fn group(label: &str, values: &[f64]) -> GroupSummary {
    GroupSummary { label: label.to_string(), n: values.len(), mean: stats::mean(values) }
}

/// Q1: is the mean score of red wine greater than the mean score of all other wines?
pub fn q1_stats(data: &Dataset, params: &StatsParams) -> Result<Verdict, String> {
    let reds = data.scores_where(|w| w.red);
    let other = data.scores_where(|w| !w.red);

    let (levene, ttest) = compare_means(&reds, &other, params).map_err(|e| format!("{}: {}", Question::Q1, e))?;
    let reject_null = greater_rejects(&ttest, params.alpha);

    let finding = if reject_null {
        "Findings suggest the mean score of red wine is greater than the mean score of all other wines."
    } else {
        "Findings suggest the mean score of red wine is less than or equal to the mean score of all other wines."
    };

    Ok(Verdict {
        question: Question::Q1,
        reject_null,
        finding: finding.to_string(),
        alpha: params.alpha,
        groups: vec![group("red", &reds), group("other", &other)],
        levene: Some(levene),
        ttest: Some(ttest),
        spearman: None,
    })
}

/// Q1 chart: overlaid score histograms with group means marked
pub fn q1_viz(data: &Dataset) -> Chart {
    let reds = data.scores_where(|w| w.red);
    let other = data.scores_where(|w| !w.red);

    let markers = [mean_marker("Average Red Wine Score", &reds), mean_marker("Average Non-Red Wine Score", &other)]
        .into_iter()
        .flatten()
        .collect();

    Chart::Histogram(Histogram::new(
        "Red wines have a higher average score than other wines",
        "score",
        vec![
            Series { label: "red".to_string(), shade: Shade::DarkRed, values: reds },
            Series { label: "other".to_string(), shade: Shade::Pink, values: other },
        ],
        markers,
    ))
}

/// Q2: is there a relationship between price and score?
///
/// Spearman's rho only detects monotonic association, but the verdict keeps
/// the "linear relationship" wording the analysis has always printed.
pub fn q2_stats(data: &Dataset, params: &StatsParams) -> Result<Verdict, String> {
    let prices = data.prices();
    let scores = data.scores();

    let spearman = stats::spearman(&prices, &scores)
        .map_err(|e| format!("{}: Spearman correlation failed: {}", Question::Q2, e))?;
    debug!("Spearman rho={:.4} p={:.4} n={}", spearman.rho, spearman.p_value, spearman.n);

    let reject_null = spearman.p_value < params.alpha;
    let finding = if reject_null {
        format!(
            "Findings suggest there is a linear relationship between a wine's score and its price.\n    Spearman's Correlation was: {:.3}",
            spearman.rho
        )
    } else {
        "Findings suggest there is not a linear relationship between a wine's score and its price.".to_string()
    };

    Ok(Verdict {
        question: Question::Q2,
        reject_null,
        finding,
        alpha: params.alpha,
        groups: vec![group("price", &prices), group("score", &scores)],
        levene: None,
        ttest: None,
        spearman: Some(spearman),
    })
}

/// Q2 chart: price box plot for each distinct score
pub fn q2_viz(data: &Dataset) -> Chart {
    let mut by_score: BTreeMap<i64, (f64, Vec<f64>)> = BTreeMap::new();
    for w in &data.records {
        // Scores carry at most one decimal in practice; key on tenths
        let key = (w.score * 10.0).round() as i64;
        by_score.entry(key).or_insert_with(|| (w.score, Vec::new())).1.push(w.price);
    }

    let rows = by_score
        .values()
        .filter_map(|(score, prices)| {
            FiveNumber::from_values(prices).map(|summary| BoxRow { label: format_score(*score), summary })
        })
        .collect();

    Chart::BoxPlot(BoxPlot {
        title: "Price and score have a positive linear relationship".to_string(),
        category_label: "score".to_string(),
        value_label: "price".to_string(),
        rows,
    })
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 { format!("{:.0}", score) } else { format!("{:.1}", score) }
}

/// Wines ranked below `split`. Only a split of 50 makes them a "bottom 50".
fn rest_name(split: u32) -> String {
    if split == 50 { "bottom 50".to_string() } else { format!("ranks {} and lower", split.saturating_add(1)) }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Q3: do wines ranked in the top `split` score higher on average than the rest?
pub fn q3_stats(data: &Dataset, params: &StatsParams) -> Result<Verdict, String> {
    let split = params.top_split;
    let top = data.scores_where(|w| w.top100_rank <= split);
    let bottom = data.scores_where(|w| w.top100_rank > split);
    let rest = rest_name(split);

    let (levene, ttest) = compare_means(&top, &bottom, params).map_err(|e| format!("{}: {}", Question::Q3, e))?;
    let reject_null = greater_rejects(&ttest, params.alpha);

    let finding = if reject_null {
        format!("Findings suggest the mean score of wines ranking in the top {} is higher.", split)
    } else {
        let compared = if split == 50 { format!("the {}", rest) } else { format!("wines in {}", rest) };
        format!("Findings suggest the mean score of wines ranking in the top {} is lower or equal to {}.", split, compared)
    };

    Ok(Verdict {
        question: Question::Q3,
        reject_null,
        finding,
        alpha: params.alpha,
        groups: vec![group(&format!("top {}", split), &top), group(&rest, &bottom)],
        levene: Some(levene),
        ttest: Some(ttest),
        spearman: None,
    })
}

/// Q3 chart: Top 100 rank by year, shaded by score, split line at the top group's boundary
pub fn q3_viz(data: &Dataset, params: &StatsParams) -> Chart {
    let points = data
        .records
        .iter()
        .map(|w| Point { x: w.top100_year as f64, y: w.top100_rank as f64, z: w.score })
        .collect();

    Chart::Scatter(Scatter {
        title: "Higher scoring wines also rank higher".to_string(),
        x_label: "top100_year".to_string(),
        y_label: "top100_rank".to_string(),
        hue_label: "score".to_string(),
        points,
        invert_y: true,
        rule: Some(HRule {
            value: params.top_split as f64,
            above: format!("Top {}", params.top_split),
            below: capitalize(&rest_name(params.top_split)),
        }),
    })
}

/// Run the hypothesis test for `question`
pub fn run_stats(question: Question, data: &Dataset, params: &StatsParams) -> Result<Verdict, String> {
    match question {
        Question::Q1 => q1_stats(data, params),
        Question::Q2 => q2_stats(data, params),
        Question::Q3 => q3_stats(data, params),
    }
}

/// Build the chart for `question`
pub fn build_chart(question: Question, data: &Dataset, params: &StatsParams) -> Chart {
    match question {
        Question::Q1 => q1_viz(data),
        Question::Q2 => q2_viz(data),
        Question::Q3 => q3_viz(data, params),
    }
}
