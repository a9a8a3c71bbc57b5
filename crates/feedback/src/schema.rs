use serde::{Deserialize, Serialize};

/// Column order of the persisted log.
pub const HEADER: [&str; 6] = [
    "timestamp",
    "user_rating",
    "user_review",
    "ai_response",
    "ai_summary",
    "ai_recommended_action",
];

/// Field order must match HEADER; the CSV writer serializes by position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub timestamp: String,
    pub user_rating: u8,
    pub user_review: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub ai_recommended_action: String,
}

/// A submission before the store stamps it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSubmission {
    pub user_rating: u8,
    pub user_review: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub ai_recommended_action: String,
}

impl NewSubmission {
    pub fn stamp(self, timestamp: String) -> SubmissionRecord {
        SubmissionRecord {
            timestamp,
            user_rating: self.user_rating,
            user_review: self.user_review,
            ai_response: self.ai_response,
            ai_summary: self.ai_summary,
            ai_recommended_action: self.ai_recommended_action,
        }
    }
}
