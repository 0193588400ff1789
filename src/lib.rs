pub mod assistant;
pub mod audio;
pub mod config;
pub mod conversation;
pub mod error;
pub mod google;
pub mod http;

pub use assistant::{Assistant, Generator, Synthesizer, Transcriber};
pub use audio::{AudioEncoding, AudioFormat};
pub use config::Config;
pub use conversation::{
    build_prompt, sanitize, ConversationExchange, ConversationHistory,
};
pub use error::AssistantError;
pub use http::{create_router, AppState};
