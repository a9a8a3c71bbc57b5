use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

use crate::dataset::DatasetRow;
use crate::error::{EvalError, Result};
use crate::parser::{matches_label, parse_response};
use crate::strategy::Predictor;

pub const DEFAULT_PREDICTION_FIELD: &str = "predicted_stars";

#[derive(Clone, Debug)]
pub struct EvalConfig {
    /// Delay between consecutive predictor calls, including across strategies
    /// in `compare`; zero disables pacing.
    pub pacing: Duration,
    pub prediction_field: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(400),
            prediction_field: DEFAULT_PREDICTION_FIELD.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub source_text: String,
    pub expected_label: i64,
    pub raw_output: String,
    pub parsed_output: Option<Map<String, Value>>,
    pub correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub accuracy: f64,
    pub validity_rate: f64,
    pub total: usize,
    pub valid_count: usize,
    pub correct_count: usize,
}

impl AggregateMetrics {
    /// Invalid outputs stay in the denominator.
    pub fn from_counts(total: usize, valid_count: usize, correct_count: usize) -> Result<Self> {
        if total == 0 {
            return Err(EvalError::EmptyDataset);
        }
        Ok(Self {
            accuracy: correct_count as f64 / total as f64,
            validity_rate: valid_count as f64 / total as f64,
            total,
            valid_count,
            correct_count,
        })
    }
}

#[derive(Clone, Debug)]
pub struct EvaluationRun {
    pub metrics: AggregateMetrics,
    pub records: Vec<EvaluationRecord>,
}

pub struct Evaluator {
    cfg: EvalConfig,
}

impl Evaluator {
    pub fn new(cfg: EvalConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.cfg
    }

    pub async fn evaluate(&self, predictor: &dyn Predictor, rows: &[DatasetRow]) -> Result<AggregateMetrics> {
        Ok(self.run(predictor, rows).await?.metrics)
    }

    /// Score every row in order, one predictor call at a time.
    pub async fn run(&self, predictor: &dyn Predictor, rows: &[DatasetRow]) -> Result<EvaluationRun> {
        if rows.is_empty() {
            return Err(EvalError::EmptyDataset);
        }

        let mut valid_count = 0usize;
        let mut correct_count = 0usize;
        let mut records = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            if i > 0 && !self.cfg.pacing.is_zero() {
                tokio::time::sleep(self.cfg.pacing).await;
            }

            let raw_output = predictor
                .predict(&row.text)
                .await
                .map_err(|source| EvalError::Prediction { row: i, source })?;

            let (parsed_output, ok) = parse_response(&raw_output);
            let mut correct = false;
            if ok {
                valid_count += 1;
                correct = parsed_output
                    .as_ref()
                    .and_then(|m| m.get(&self.cfg.prediction_field))
                    .is_some_and(|v| matches_label(v, row.stars));
                if correct {
                    correct_count += 1;
                }
            }

            debug!(row = i, valid = ok, correct, expected = row.stars, "eval: row scored");

            records.push(EvaluationRecord {
                source_text: row.text.clone(),
                expected_label: row.stars,
                raw_output,
                parsed_output,
                correct,
            });
        }

        let metrics = AggregateMetrics::from_counts(rows.len(), valid_count, correct_count)?;
        info!(
            total = metrics.total,
            accuracy = metrics.accuracy,
            validity_rate = metrics.validity_rate,
            "eval: run complete"
        );

        Ok(EvaluationRun { metrics, records })
    }
}
