use crate::assistant::Assistant;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The assistant, owning the adapters and conversation history
    pub assistant: Arc<Assistant>,

    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(assistant: Arc<Assistant>, max_upload_bytes: usize) -> Self {
        Self {
            assistant,
            max_upload_bytes,
        }
    }
}
