use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use textgen::{GenerationError, TextGenerator};

use crate::admin::{submission_rows, FeedbackOverview, SubmissionRow};
use crate::prompts::{admin_action_prompt, admin_summary_prompt, user_response_prompt};
use crate::schema::{NewSubmission, SubmissionRecord};
use crate::store::{StoreError, SubmissionStore};
use crate::validation::{validate_input, ValidationError};

pub const RETRY_MESSAGE: &str = "We couldn't process your feedback right now. Please try again in a moment.";

/// Sampling temperatures for the three calls made per submission.
#[derive(Clone, Debug)]
pub struct FeedbackConfig {
    pub reply_temperature: f32,
    pub summary_temperature: f32,
    pub action_temperature: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            reply_temperature: 0.4,
            summary_temperature: 0.2,
            action_temperature: 0.3,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("storage failed: {0}")]
    Storage(#[from] StoreError),
}

impl SubmitError {
    /// Safe to show to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Generation(_) | Self::Storage(_) => RETRY_MESSAGE.to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Generation(e) => e.is_retryable(),
            Self::Storage(_) => true,
        }
    }
}

#[derive(Clone)]
pub struct FeedbackService {
    generator: Arc<dyn TextGenerator>,
    store: SubmissionStore,
    cfg: FeedbackConfig,
}

impl FeedbackService {
    pub fn new(generator: Arc<dyn TextGenerator>, store: SubmissionStore, cfg: FeedbackConfig) -> Self {
        Self { generator, store, cfg }
    }

    pub fn store(&self) -> &SubmissionStore {
        &self.store
    }

    /// Validate, generate reply/summary/action, then append one record.
    ///
    /// Nothing is written unless all three generations succeed.
    pub async fn submit(&self, rating: i64, review: &str) -> Result<String, SubmitError> {
        let rating = validate_input(rating, review)?;

        let ai_response = self
            .generator
            .generate(&user_response_prompt(rating, review), self.cfg.reply_temperature)
            .await?;
        debug!("feedback: reply generated");

        let ai_summary = self
            .generator
            .generate(&admin_summary_prompt(rating, review), self.cfg.summary_temperature)
            .await?;
        debug!("feedback: summary generated");

        let ai_recommended_action = self
            .generator
            .generate(&admin_action_prompt(rating, review), self.cfg.action_temperature)
            .await?;
        debug!("feedback: action generated");

        let submission = NewSubmission {
            user_rating: rating,
            user_review: review.to_string(),
            ai_response: ai_response.clone(),
            ai_summary,
            ai_recommended_action,
        };

        let store = self.store.clone();
        let record = tokio::task::spawn_blocking(move || store.append(submission))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;

        info!(rating, timestamp = %record.timestamp, "feedback: submission stored");
        Ok(ai_response)
    }

    pub async fn records(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.load_all())
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }

    pub async fn overview(&self) -> Result<FeedbackOverview, StoreError> {
        Ok(FeedbackOverview::from_records(&self.records().await?))
    }

    pub async fn submissions(&self) -> Result<Vec<SubmissionRow>, StoreError> {
        Ok(submission_rows(&self.records().await?))
    }

    /// Full record at 1-based `position`.
    pub async fn submission(&self, position: usize) -> Result<Option<SubmissionRecord>, StoreError> {
        if position == 0 {
            return Ok(None);
        }
        Ok(self.records().await?.into_iter().nth(position - 1))
    }
}
