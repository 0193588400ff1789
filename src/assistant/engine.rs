use super::adapters::{Generator, Synthesizer, Transcriber};
use crate::conversation::{
    build_prompt, sanitize, validate_question, ConversationExchange, ConversationHistory,
};
use crate::error::{AssistantError, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// The voice assistant: external adapters plus the conversation history.
///
/// Each operation calls at most one external service and never retries.
pub struct Assistant {
    transcriber: Arc<dyn Transcriber>,
    generator: Arc<dyn Generator>,
    synthesizer: Arc<dyn Synthesizer>,
    history: Arc<ConversationHistory>,
}

impl Assistant {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        generator: Arc<dyn Generator>,
        synthesizer: Arc<dyn Synthesizer>,
        history: Arc<ConversationHistory>,
    ) -> Self {
        Self {
            transcriber,
            generator,
            synthesizer,
            history,
        }
    }

    /// Transcribe uploaded audio
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        if audio.is_empty() {
            return Err(AssistantError::NoTranscription);
        }

        debug!(
            "Transcribing {} bytes with {}",
            audio.len(),
            self.transcriber.name()
        );
        let text = self.transcriber.transcribe(audio).await?;
        info!("Transcription complete ({} chars)", text.chars().count());

        Ok(text)
    }

    /// Answer a question using the conversation history as context.
    ///
    /// The exchange is appended only once the generator succeeded.
    pub async fn respond(&self, question: &str) -> Result<String> {
        validate_question(question)?;

        let _turn = self.history.begin_turn().await;

        let prior = self.history.snapshot().await;
        let prompt = build_prompt(&prior, question)?;

        debug!(
            "Generating response with {} ({} prior exchange(s), prompt {} bytes)",
            self.generator.name(),
            prior.len(),
            prompt.len()
        );
        let raw = self.generator.generate(&prompt).await?;
        let response = sanitize(&raw);

        self.history
            .append(ConversationExchange::new(question, response.clone()))
            .await;

        info!("Response generated ({} chars)", response.chars().count());

        Ok(response)
    }

    /// Synthesize text into encoded audio
    pub async fn speak(&self, text: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(AssistantError::missing_text());
        }

        debug!(
            "Synthesizing {} chars with {}",
            text.chars().count(),
            self.synthesizer.name()
        );
        let audio = self.synthesizer.synthesize(text).await?;
        info!("Synthesized {} bytes of audio", audio.len());

        Ok(audio)
    }

    /// Forget the whole conversation
    pub async fn reset(&self) {
        let _turn = self.history.begin_turn().await;
        self.history.reset().await;
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }
}
