use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::info;

use crate::aggregate::{AggregateMetrics, Evaluator};
use crate::dataset::DatasetRow;
use crate::error::Result;
use crate::strategy::Predictor;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub name: String,
    pub accuracy: f64,
    pub validity_rate: f64,
    pub total: usize,
    pub valid_count: usize,
    pub correct_count: usize,
}

impl StrategyResult {
    fn from_metrics(name: &str, m: AggregateMetrics) -> Self {
        Self {
            name: name.to_string(),
            accuracy: m.accuracy,
            validity_rate: m.validity_rate,
            total: m.total,
            valid_count: m.valid_count,
            correct_count: m.correct_count,
        }
    }
}

/// Evaluate each strategy independently, results in insertion order.
///
/// The evaluator's pacing also separates the last call of one strategy
/// from the first call of the next.
pub async fn compare(
    evaluator: &Evaluator,
    strategies: &[(String, Arc<dyn Predictor>)],
    rows: &[DatasetRow],
) -> Result<Vec<StrategyResult>> {
    let mut out = Vec::with_capacity(strategies.len());
    let pacing = evaluator.config().pacing;
    for (i, (name, predictor)) in strategies.iter().enumerate() {
        if i > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
        info!(strategy = %name, rows = rows.len(), "compare: evaluating strategy");
        let metrics = evaluator.evaluate(predictor.as_ref(), rows).await?;
        out.push(StrategyResult::from_metrics(name, metrics));
    }
    Ok(out)
}

pub fn render_table(results: &[StrategyResult]) -> String {
    let width = results
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("strategy".len()))
        .max()
        .unwrap_or(8);

    let mut s = String::new();
    let _ = writeln!(s, "{:<width$}  {:>8}  {:>13}  {:>5}", "strategy", "accuracy", "validity_rate", "rows");
    let _ = writeln!(s, "{}", "-".repeat(width + 2 + 8 + 2 + 13 + 2 + 5));
    for r in results {
        let _ = writeln!(
            s,
            "{:<width$}  {:>8.3}  {:>13.3}  {:>5}",
            r.name, r.accuracy, r.validity_rate, r.total
        );
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::EvalConfig;
    use crate::strategy::FnPredictor;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_pacing_spans_strategy_boundary() {
        let ev = Evaluator::new(EvalConfig { pacing: Duration::from_millis(400), ..EvalConfig::default() });
        let strategies: Vec<(String, Arc<dyn Predictor>)> = vec![
            ("A".to_string(), Arc::new(FnPredictor(|_: &str| r#"{"predicted_stars": 5}"#.to_string())) as Arc<dyn Predictor>),
            ("B".to_string(), Arc::new(FnPredictor(|_: &str| "nope".to_string())) as Arc<dyn Predictor>),
        ];
        let rows = vec![DatasetRow::new("one", 5), DatasetRow::new("two", 5)];

        let start = tokio::time::Instant::now();
        let results = compare(&ev, &strategies, &rows).await.unwrap();
        // four calls, three gaps: one inside each run plus one between runs
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1200), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1600), "{elapsed:?}");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_render_table_layout() {
        let rows = vec![
            StrategyResult {
                name: "zero_shot".into(),
                accuracy: 0.5,
                validity_rate: 1.0,
                total: 4,
                valid_count: 4,
                correct_count: 2,
            },
            StrategyResult {
                name: "rubric".into(),
                accuracy: 0.25,
                validity_rate: 0.75,
                total: 4,
                valid_count: 3,
                correct_count: 1,
            },
        ];
        let table = render_table(&rows);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("strategy "));
        assert!(lines[2].starts_with("zero_shot"));
        assert!(lines[2].contains("0.500"));
        assert!(lines[3].contains("0.750"));
    }
}
