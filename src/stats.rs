//! Descriptive statistics and the classical hypothesis tests used by the
//! research questions.
//!
//! Conventions follow SciPy so results can be cross-checked against a
//! notebook: sample variance uses `ddof = 1`, Levene defaults to the
//! median-centred (Brown-Forsythe) variant, ties in Spearman ranks get the
//! average rank, and every p-value is two-sided.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use std::fmt;

/// Errors raised when a sample cannot support the requested test
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    /// A group has fewer observations than the test needs
    TooFewObservations { needed: usize, got: usize },
    /// Paired inputs differ in length
    LengthMismatch { left: usize, right: usize },
    /// A sample contains NaN or infinity
    NonFinite,
    /// statrs rejected the distribution parameters
    Distribution(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::TooFewObservations { needed, got } => {
                write!(f, "need at least {} observations, got {}", needed, got)
            }
            StatsError::LengthMismatch { left, right } => {
                write!(f, "paired samples differ in length ({} vs {})", left, right)
            }
            StatsError::NonFinite => write!(f, "sample contains NaN or infinite values"),
            StatsError::Distribution(msg) => write!(f, "invalid distribution parameters: {}", msg),
        }
    }
}

impl std::error::Error for StatsError {}

/// Where Levene's test centres each group before taking absolute deviations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeveneCenter {
    #[default]
    Median,
    Mean,
}

impl LeveneCenter {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "median" => Ok(LeveneCenter::Median),
            "mean" => Ok(LeveneCenter::Mean),
            other => Err(format!("Unknown Levene center '{}': expected 'median' or 'mean'", other)),
        }
    }
}

impl fmt::Display for LeveneCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeveneCenter::Median => write!(f, "median"),
            LeveneCenter::Mean => write!(f, "mean"),
        }
    }
}

/// Result of Levene's test for equal variances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeveneResult {
    pub statistic: f64,
    pub p_value: f64,
    pub center: LeveneCenter,
}

/// Result of an independent two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    pub df: f64,
    /// true = pooled (Student), false = Welch
    pub equal_var: bool,
}

impl TTestResult {
    /// One-sided p-value for the alternative "first mean is greater", as the
    /// halved two-sided value. Only meaningful together with `statistic > 0`.
    pub fn half_p(&self) -> f64 {
        self.p_value / 2.0
    }
}

/// Result of a Spearman rank correlation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpearmanResult {
    pub rho: f64,
    pub p_value: f64,
    pub n: usize,
}

fn ensure_finite(xs: &[f64]) -> Result<(), StatsError> {
    if xs.iter().all(|v| v.is_finite()) { Ok(()) } else { Err(StatsError::NonFinite) }
}

fn ensure_len(xs: &[f64], needed: usize) -> Result<(), StatsError> {
    if xs.len() < needed { Err(StatsError::TooFewObservations { needed, got: xs.len() }) } else { Ok(()) }
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample variance (ddof = 1); NaN with fewer than two values
pub fn variance(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let m = mean(xs);
    xs.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (xs.len() - 1) as f64
}

/// Copy and sort ascending. NaNs sort last.
pub fn sorted(xs: &[f64]) -> Vec<f64> {
    let mut v = xs.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// Quantile of already-sorted data with linear interpolation (numpy's default)
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn median(xs: &[f64]) -> f64 {
    quantile_sorted(&sorted(xs), 0.5)
}

/// Levene's test for equality of variances between two groups.
pub fn levene(a: &[f64], b: &[f64], center: LeveneCenter) -> Result<LeveneResult, StatsError> {
    ensure_len(a, 2)?;
    ensure_len(b, 2)?;
    ensure_finite(a)?;
    ensure_finite(b)?;

    let groups = [a, b];
    let k = groups.len() as f64;
    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    let n_total_f = n_total as f64;

    // Absolute deviations from each group's centre
    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let c = match center {
                LeveneCenter::Median => median(g),
                LeveneCenter::Mean => mean(g),
            };
            g.iter().map(|v| (v - c).abs()).collect()
        })
        .collect();

    let group_means: Vec<f64> = deviations.iter().map(|z| mean(z)).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / n_total_f;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.len() as f64 * (zm - grand_mean) * (zm - grand_mean))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.iter().map(|v| (v - zm) * (v - zm)).sum::<f64>())
        .sum();

    let df1 = k - 1.0;
    let df2 = n_total_f - k;

    if within == 0.0 {
        let statistic = if between == 0.0 { f64::NAN } else { f64::INFINITY };
        let p_value = if between == 0.0 { f64::NAN } else { 0.0 };
        return Ok(LeveneResult { statistic, p_value, center });
    }

    let statistic = (df2 / df1) * (between / within);
    let dist = FisherSnedecor::new(df1, df2).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = dist.sf(statistic).clamp(0.0, 1.0);

    Ok(LeveneResult { statistic, p_value, center })
}

/// Independent two-sample t-test of `mean(a) - mean(b)`.
pub fn ttest_ind(a: &[f64], b: &[f64], equal_var: bool) -> Result<TTestResult, StatsError> {
    ensure_len(a, 2)?;
    ensure_len(b, 2)?;
    ensure_finite(a)?;
    ensure_finite(b)?;

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (v1, v2) = (variance(a), variance(b));
    let diff = mean(a) - mean(b);

    let (se, df) = if equal_var {
        let df = n1 + n2 - 2.0;
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
        ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
    } else {
        let (q1, q2) = (v1 / n1, v2 / n2);
        let df = (q1 + q2).powi(2) / (q1 * q1 / (n1 - 1.0) + q2 * q2 / (n2 - 1.0));
        ((q1 + q2).sqrt(), df)
    };

    if se == 0.0 {
        let (statistic, p_value) = if diff == 0.0 {
            (f64::NAN, f64::NAN)
        } else {
            (diff.signum() * f64::INFINITY, 0.0)
        };
        return Ok(TTestResult { statistic, p_value, df, equal_var });
    }

    let statistic = diff / se;
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * dist.sf(statistic.abs())).clamp(0.0, 1.0);

    Ok(TTestResult { statistic, p_value, df, equal_var })
}

/// 1-based ranks with ties assigned their average rank
pub fn rank_average(xs: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..xs.len()).collect();
    order.sort_by(|&i, &j| xs[i].total_cmp(&xs[j]));

    let mut ranks = vec![0.0; xs.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && xs[order[end]] == xs[order[start]] {
            end += 1;
        }
        // Positions start..end share the average of ranks start+1..=end
        let avg = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg;
        }
        start = end;
    }
    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (mx, my) = (mean(x), mean(y));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx) * (a - mx);
        syy += (b - my) * (b - my);
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Spearman rank correlation between paired samples.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<SpearmanResult, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch { left: x.len(), right: y.len() });
    }
    ensure_len(x, 3)?;
    ensure_finite(x)?;
    ensure_finite(y)?;

    let n = x.len();
    let rho = pearson(&rank_average(x), &rank_average(y));

    if rho.is_nan() {
        return Ok(SpearmanResult { rho, p_value: f64::NAN, n });
    }
    if rho.abs() == 1.0 {
        return Ok(SpearmanResult { rho, p_value: 0.0, n });
    }

    let df = (n - 2) as f64;
    let t = rho * (df / ((1.0 - rho) * (1.0 + rho))).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0);

    Ok(SpearmanResult { rho, p_value, n })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_mean_and_variance() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&xs), 5.0);
        // Sum of squared deviations is 32, ddof = 1
        assert!(close(variance(&xs), 32.0 / 7.0, 1e-12));
        assert!(mean(&[]).is_nan());
        assert!(variance(&[1.0]).is_nan());
    }

    #[test]
    fn test_quantiles_interpolate() {
        let xs = sorted(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(quantile_sorted(&xs, 0.0), 1.0);
        assert_eq!(quantile_sorted(&xs, 1.0), 4.0);
        assert!(close(quantile_sorted(&xs, 0.5), 2.5, 1e-12));
        assert!(close(quantile_sorted(&xs, 0.25), 1.75, 1e-12));
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
    }

    #[test]
    fn test_rank_average_ties() {
        let ranks = rank_average(&[10.0, 20.0, 10.0, 30.0]);
        assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_ttest_student_known_value() {
        // mean diff -3, pooled variance 2.5, se = sqrt(2.5 * 0.4) = 1
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [4.0, 5.0, 6.0, 7.0, 8.0];
        let r = ttest_ind(&a, &b, true).unwrap();
        assert!(close(r.statistic, -3.0, 1e-12));
        assert_eq!(r.df, 8.0);
        assert!(r.equal_var);
        // Two-sided p for |t| = 3 on 8 df is about 0.0171
        assert!(close(r.p_value, 0.0171, 5e-4), "p = {}", r.p_value);
    }

    #[test]
    fn test_ttest_welch_df() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        let r = ttest_ind(&a, &b, false).unwrap();
        assert!(!r.equal_var);
        // Welch df lies between min(n)-1 and n1+n2-2
        assert!(r.df > 4.0 && r.df < 9.0, "df = {}", r.df);
        assert!(r.statistic < 0.0);
    }

    #[test]
    fn test_ttest_identical_samples() {
        let a = [1.0, 2.0, 3.0];
        let r = ttest_ind(&a, &a, true).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!(close(r.p_value, 1.0, 1e-12));
    }

    #[test]
    fn test_ttest_zero_spread() {
        let r = ttest_ind(&[3.0, 3.0], &[1.0, 1.0], true).unwrap();
        assert_eq!(r.statistic, f64::INFINITY);
        assert_eq!(r.p_value, 0.0);

        let r = ttest_ind(&[2.0, 2.0], &[2.0, 2.0], false).unwrap();
        assert!(r.statistic.is_nan());
        assert!(r.p_value.is_nan());
    }

    #[test]
    fn test_ttest_rejects_small_groups() {
        let err = ttest_ind(&[1.0], &[1.0, 2.0], true).unwrap_err();
        assert_eq!(err, StatsError::TooFewObservations { needed: 2, got: 1 });
    }

    #[test]
    fn test_levene_known_value() {
        // Mean-centred deviations: a -> [1, 0, 1], b -> [2, 0, 2]
        // between = 3*(2/3-1)^2 + 3*(4/3-1)^2 = 2/3
        // within  = 2/3 + 8/3 = 10/3, W = (4/1) * (2/3)/(10/3) = 0.8
        let a = [1.0, 2.0, 3.0];
        let b = [0.0, 2.0, 4.0];
        let r = levene(&a, &b, LeveneCenter::Mean).unwrap();
        assert!(close(r.statistic, 0.8, 1e-12), "W = {}", r.statistic);
        assert!(r.p_value > 0.3 && r.p_value < 0.6, "p = {}", r.p_value);

        // Symmetric groups: median and mean centring agree
        let m = levene(&a, &b, LeveneCenter::Median).unwrap();
        assert!(close(m.statistic, r.statistic, 1e-12));
    }

    #[test]
    fn test_levene_detects_unequal_spread() {
        let tight: Vec<f64> = (0..30).map(|i| 90.0 + (i % 3) as f64 * 0.1).collect();
        let wide: Vec<f64> = (0..30).map(|i| 80.0 + (i % 10) as f64 * 2.0).collect();
        let r = levene(&tight, &wide, LeveneCenter::Median).unwrap();
        assert!(r.p_value < 0.001, "p = {}", r.p_value);
    }

    #[test]
    fn test_levene_degenerate_is_nan() {
        let r = levene(&[1.0, 1.0], &[5.0, 5.0], LeveneCenter::Median).unwrap();
        assert!(r.statistic.is_nan());
        assert!(r.p_value.is_nan());
    }

    #[test]
    fn test_levene_constant_deviations_differ() {
        // Deviations are [1, 1] and [0, 0]: no spread within groups, some between
        let r = levene(&[1.0, 3.0], &[5.0, 5.0], LeveneCenter::Median).unwrap();
        assert_eq!(r.statistic, f64::INFINITY);
        assert_eq!(r.p_value, 0.0);
    }

    #[test]
    fn test_spearman_perfect_monotonic() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 4.0, 9.0, 16.0, 25.0];
        let r = spearman(&x, &y).unwrap();
        assert_eq!(r.rho, 1.0);
        assert_eq!(r.p_value, 0.0);

        let rev: Vec<f64> = y.iter().rev().copied().collect();
        assert_eq!(spearman(&x, &rev).unwrap().rho, -1.0);
    }

    #[test]
    fn test_spearman_known_value() {
        // Rank differences d = [0, 0, 1, -1, 0]: rho = 1 - 6*2/(5*24) = 0.9
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 20.0, 40.0, 30.0, 50.0];
        let r = spearman(&x, &y).unwrap();
        assert!(close(r.rho, 0.9, 1e-12));
        // t = 0.9 * sqrt(3 / 0.19) on 3 df, two-sided p about 0.037
        assert!(close(r.p_value, 0.0374, 2e-3), "p = {}", r.p_value);
    }

    #[test]
    fn test_spearman_constant_input_is_nan() {
        let r = spearman(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(r.rho.is_nan());
        assert!(r.p_value.is_nan());
    }

    #[test]
    fn test_spearman_length_mismatch() {
        let err = spearman(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatsError::LengthMismatch { left: 3, right: 2 });
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(ttest_ind(&[1.0, f64::NAN], &[1.0, 2.0], true).unwrap_err(), StatsError::NonFinite);
    }

    #[test]
    fn test_levene_center_parse() {
        assert_eq!(LeveneCenter::parse("Median").unwrap(), LeveneCenter::Median);
        assert_eq!(LeveneCenter::parse(" mean ").unwrap(), LeveneCenter::Mean);
        assert!(LeveneCenter::parse("trimmed").is_err());
    }
}
