//! Conversation state for the response generator
//!
//! This module provides:
//! - `ConversationExchange`: one question/response pair
//! - `ConversationHistory`: the shared, ordered exchange store
//! - Prompt construction from history plus the new question
//! - Sanitizing of generated text before it reaches speech synthesis

mod exchange;
mod history;
mod prompt;
mod sanitize;

pub use exchange::ConversationExchange;
pub use history::{ConversationHistory, TurnGuard};
pub use prompt::{build_prompt, validate_question, HISTORY_HEADER, QUESTION_PREFIX};
pub use sanitize::sanitize;
