/// Tests for runner module
#[cfg(test)]
mod tests {
    use crate::dataset::{ColumnMap, Dataset, WineRecord};
    use crate::runner::{run_analysis, verdicts};
    use crate::types::*;
    use std::path::PathBuf;

    /// Helper to create a minimal analysis plan
    fn create_plan(questions: Vec<Question>, output_mode: OutputMode) -> AnalysisPlan {
        AnalysisPlan {
            data_path: PathBuf::from("wines.csv"),
            columns: ColumnMap::default(),
            questions,
            params: StatsParams::default(),
            output_mode,
            skip_invalid: false,
            simple: false,
            use_colors: false,
            json_path: None,
            markdown_path: None,
            config_source: None,
        }
    }

    fn create_dataset() -> Dataset {
        let records = (0..30u32)
            .map(|i| WineRecord {
                score: 88.0 + (i % 9) as f64,
                price: 20.0 + (i % 9) as f64 * 15.0 + (i % 4) as f64,
                red: i % 3 != 0,
                top100_year: 2000 + (i % 12) as i32,
                top100_rank: (i * 37) % 100 + 1,
            })
            .collect();
        Dataset::new(records)
    }

    #[test]
    fn test_outcomes_follow_plan_order() {
        let plan = create_plan(vec![Question::Q3, Question::Q1], OutputMode::Both);
        let mut streamed = Vec::new();
        let outcomes = run_analysis(&plan, &create_dataset(), |o| streamed.push(o.question));

        assert_eq!(streamed, vec![Question::Q3, Question::Q1]);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.chart.is_some() && o.verdict.is_some()));
    }

    #[test]
    fn test_stats_only_skips_charts() {
        let plan = create_plan(Question::all(), OutputMode::StatsOnly);
        let outcomes = run_analysis(&plan, &create_dataset(), |_| {});
        assert!(outcomes.iter().all(|o| o.chart.is_none()));
        assert_eq!(verdicts(&outcomes).len(), 3);
    }

    #[test]
    fn test_charts_only_skips_stats() {
        let plan = create_plan(Question::all(), OutputMode::ChartsOnly);
        let outcomes = run_analysis(&plan, &create_dataset(), |_| {});
        assert!(outcomes.iter().all(|o| o.verdict.is_none() && o.chart.is_some()));
        assert!(verdicts(&outcomes).is_empty());
    }

    #[test]
    fn test_failed_question_does_not_stop_run() {
        // Every wine is red: Q1 has no comparison group, Q2 still runs
        let mut data = create_dataset();
        for w in &mut data.records {
            w.red = true;
        }
        let plan = create_plan(vec![Question::Q1, Question::Q2], OutputMode::StatsOnly);
        let outcomes = run_analysis(&plan, &data, |_| {});

        assert!(outcomes[0].failed());
        assert!(outcomes[0].error.as_deref().unwrap_or("").starts_with("Q1"));
        assert!(!outcomes[1].failed());
        assert!(outcomes[1].verdict.is_some());
    }
}
