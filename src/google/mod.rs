//! Google Cloud adapters
//!
//! - `SpeechClient`: Speech-to-Text (OAuth2, service account)
//! - `GeminiClient`: Gemini generative text (API key)
//! - `TextToSpeechClient`: Text-to-Speech (OAuth2, service account)

pub mod auth;
pub mod gemini;
pub mod messages;
pub mod speech;
pub mod tts;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use gemini::GeminiClient;
pub use speech::SpeechClient;
pub use tts::TextToSpeechClient;

use crate::config::GoogleConfig;
use anyhow::Result;

/// Pick the inline service-account key, falling back to the key file
pub fn resolve_credentials(config: &GoogleConfig) -> Result<ServiceAccountKey> {
    if let Some(key) = &config.credentials {
        return Ok(key.clone());
    }

    match &config.credentials_file {
        Some(path) => ServiceAccountKey::from_file(path),
        None => anyhow::bail!(
            "Google credentials are not configured (set GOOGLE_CREDENTIALS_* or GOOGLE_APPLICATION_CREDENTIALS)"
        ),
    }
}
