use serde::{Deserialize, Serialize};

use crate::schema::SubmissionRecord;

pub const TABLE_TEXT_CHARS: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOverview {
    pub total_submissions: usize,
    /// Mean rating rounded to two decimals; `None` before the first submission.
    pub average_rating: Option<f64>,
    /// Ratings of 2 stars or fewer.
    pub low_ratings: usize,
}

impl FeedbackOverview {
    pub fn from_records(records: &[SubmissionRecord]) -> Self {
        let total = records.len();
        let average_rating = (total > 0).then(|| {
            let sum: u64 = records.iter().map(|r| u64::from(r.user_rating)).sum();
            let mean = sum as f64 / total as f64;
            (mean * 100.0).round() / 100.0
        });
        let low_ratings = records.iter().filter(|r| r.user_rating <= 2).count();

        Self { total_submissions: total, average_rating, low_ratings }
    }
}

/// Cut display text to `max_chars` characters, appending "..." when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// One line of the admin table, free text cut for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub position: usize,
    pub timestamp: String,
    pub user_rating: u8,
    pub user_review: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub ai_recommended_action: String,
}

pub fn submission_rows(records: &[SubmissionRecord]) -> Vec<SubmissionRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| SubmissionRow {
            position: i + 1,
            timestamp: r.timestamp.clone(),
            user_rating: r.user_rating,
            user_review: truncate_text(&r.user_review, TABLE_TEXT_CHARS),
            ai_response: truncate_text(&r.ai_response, TABLE_TEXT_CHARS),
            ai_summary: truncate_text(&r.ai_summary, TABLE_TEXT_CHARS),
            ai_recommended_action: truncate_text(&r.ai_recommended_action, TABLE_TEXT_CHARS),
        })
        .collect()
}
