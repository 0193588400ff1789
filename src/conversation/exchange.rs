use serde::{Deserialize, Serialize};

/// A single question/response pair kept in conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationExchange {
    /// Question as asked by the user
    pub question: String,

    /// Sanitized response returned to the user
    pub response: String,
}

impl ConversationExchange {
    pub fn new(question: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
        }
    }
}
