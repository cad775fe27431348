/// Integration tests for the wine-explore binary
///
/// These tests run the compiled binary against the fixture dataset in
/// tests/fixtures and check its console output, exit codes and reports.
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Helper to get the fixture dataset
fn fixture_csv() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/wines.csv")
}

// Helper to run the binary with a fixed console width and no colors
fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wine-explore"))
        .args(args)
        .args(["--console-width", "100", "--no-color"])
        .current_dir(cwd)
        .env_remove("WINE_EXPLORE_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run wine-explore {}: {}", args.join(" "), e))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// Helper to assert the command succeeded
fn assert_success(output: &Output, context: &str) {
    assert!(
        output.status.success(),
        "{} failed with status: {:?}\nstdout: {}\nstderr: {}",
        context,
        output.status.code(),
        stdout(output),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_fixture_exists() {
    assert!(fixture_csv().exists(), "fixture dataset should exist");
}

#[test]
fn test_full_run_prints_all_verdicts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture_csv();
    let output = run(&["--data", csv.to_str().unwrap()], dir.path());
    assert_success(&output, "full run");

    let out = stdout(&output);
    assert!(out.contains("Analysing 80 wines"));
    assert!(out.contains("Red wines have a higher average score than other wines"));
    assert!(out.contains("Price and score have a positive linear relationship"));
    assert!(out.contains("Higher scoring wines also rank higher"));
    assert_eq!(out.matches("Reject the Null Hypothesis.").count(), 3);
    assert!(out.contains("Spearman's Correlation was: 0.884"));
    assert!(out.contains("Hypothesis test summary"));
}

#[test]
fn test_q1_uses_welch_after_levene() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture_csv();
    let output = run(&["--data", csv.to_str().unwrap(), "-q", "q1", "--stats-only"], dir.path());
    assert_success(&output, "q1 stats");

    let out = stdout(&output);
    // Levene p is about 0.024 on this fixture, so equal variances are rejected
    assert!(out.contains("Welch: t=5.05"), "stdout:\n{}", out);
    assert!(out.contains("red          n=47"));
    assert!(!out.contains("Red wines have a higher average score"), "charts should be skipped");
}

#[test]
fn test_q3_uses_pooled_variance() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture_csv();
    let output = run(&["--data", csv.to_str().unwrap(), "-q", "q3", "--stats-only"], dir.path());
    assert_success(&output, "q3 stats");

    let out = stdout(&output);
    assert!(out.contains("Student: t=7.42"), "stdout:\n{}", out);
    assert!(out.contains("df=78.00"));
    assert!(out.contains("ranking in the top 50 is higher"));
}

#[test]
fn test_fail_to_reject_when_reds_score_lower() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("flipped.csv");
    let mut body = String::from("score,price,red,top100_year,top100_rank\n");
    for i in 0..20 {
        let red = i % 2;
        let score = if red == 1 { 90 + i % 3 } else { 94 + i % 3 };
        body.push_str(&format!("{},{},{},2015,{}\n", score, 20 + i, red, i + 1));
    }
    fs::write(&csv, body).unwrap();

    let output = run(&["--data", csv.to_str().unwrap(), "-q", "1", "--simple"], dir.path());
    assert_success(&output, "flipped q1");

    let out = stdout(&output);
    assert!(out.starts_with("Q1: FAIL TO REJECT H0"), "stdout:\n{}", out);
    assert!(out.contains("less than or equal to the mean score of all other wines"));
}

#[test]
fn test_reports_written() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture_csv();
    let json_path = dir.path().join("report.json");
    let md_path = dir.path().join("report.md");

    let output = run(
        &[
            "--data",
            csv.to_str().unwrap(),
            "--json",
            json_path.to_str().unwrap(),
            "--markdown",
            md_path.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert_success(&output, "reports");

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["dataset"]["wines"], 80);
    assert_eq!(json["verdicts"].as_array().unwrap().len(), 3);
    assert!(json["verdicts"].as_array().unwrap().iter().all(|v| v["reject_null"] == true));

    let md = fs::read_to_string(&md_path).unwrap();
    assert!(md.starts_with("# Wine Exploration Report"));
    assert!(md.contains("**Reject the Null Hypothesis.**"));
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wine-explore.toml"), "top_split = 20\n").unwrap();
    let csv = fixture_csv();

    let output = run(&["--data", csv.to_str().unwrap(), "-q", "q3", "--simple"], dir.path());
    assert_success(&output, "config from cwd");
    assert!(stdout(&output).contains("top 20"), "stdout:\n{}", stdout(&output));
}

#[test]
fn test_renamed_columns_via_config() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("renamed.csv");
    let original = fs::read_to_string(fixture_csv()).unwrap();
    let renamed = original.replacen("score,price,red", "points,usd,is_red", 1);
    fs::write(&csv, renamed).unwrap();

    let config = dir.path().join("columns.toml");
    fs::write(&config, "[columns]\nscore = \"points\"\nprice = \"usd\"\nred = \"is_red\"\n").unwrap();

    let output = run(
        &["--data", csv.to_str().unwrap(), "--config", config.to_str().unwrap(), "-q", "q2", "--simple"],
        dir.path(),
    );
    assert_success(&output, "renamed columns");
    assert!(stdout(&output).contains("Spearman's Correlation was: 0.884"));
}

#[test]
fn test_missing_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("broken.csv");
    fs::write(&csv, "score,price,red\n95,10,1\n").unwrap();

    let output = run(&["--data", csv.to_str().unwrap()], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Column 'top100_year' not found"));
}

#[test]
fn test_conflicting_flags_fail() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture_csv();
    let output = run(&["--data", csv.to_str().unwrap(), "--stats-only", "--charts-only"], dir.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_question_without_comparison_group_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("all_red.csv");
    fs::write(&csv, "score,price,red,top100_year,top100_rank\n95,10,1,2019,1\n93,20,1,2019,2\n91,15,1,2019,70\n")
        .unwrap();

    let output = run(&["--data", csv.to_str().unwrap(), "-q", "q1", "--simple"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Q1: ERROR"));
}
