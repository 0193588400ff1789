use crate::error::Result;

/// Speech-to-text boundary
///
/// Implementations return `NoTranscription` when the service recognized
/// nothing and `Transcription` for any other upstream failure.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe uploaded audio bytes, returning the first transcript
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;

    /// Adapter name for logging
    fn name(&self) -> &str;
}

/// Generative text boundary
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    /// Generate a response for a fully rendered prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// Text-to-speech boundary
#[async_trait::async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize text into encoded audio bytes
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    fn name(&self) -> &str;
}
