use std::sync::Arc;

use feedback::FeedbackService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub feedback: FeedbackService,
}

impl AppState {
    pub fn new(feedback: FeedbackService) -> Self {
        Self { feedback }
    }
}
