use thiserror::Error;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const MIN_REVIEW_CHARS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a valid star rating (1-5).")]
    InvalidRating { rating: i64 },

    #[error("Please write a short review (at least 5 characters).")]
    ReviewTooShort { chars: usize },
}

/// Returns the rating narrowed to `u8` when input is acceptable.
pub fn validate_input(rating: i64, review: &str) -> Result<u8, ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::InvalidRating { rating });
    }

    let chars = review.trim().chars().count();
    if chars < MIN_REVIEW_CHARS {
        return Err(ValidationError::ReviewTooShort { chars });
    }

    Ok(rating as u8)
}
