//! HTTP API for the voice assistant
//!
//! - GET / - Greeting
//! - GET /health - Health check
//! - POST /transcribe - Speech to text (multipart `file`)
//! - POST /generate-response - Answer a question using conversation history
//! - POST /text-to-speech - Text to MP3
//! - DELETE /reset-conversation - Clear conversation history

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ErrorResponse;
pub use routes::create_router;
pub use state::AppState;
