use super::auth::TokenProvider;
use super::messages::{RecognitionAudio, RecognitionConfig, RecognizeRequest, RecognizeResponse};
use crate::assistant::Transcriber;
use crate::audio::AudioFormat;
use crate::config::SpeechConfig;
use crate::error::{AssistantError, Result};
use anyhow::Context;
use base64::Engine;
use std::sync::Arc;
use tracing::debug;

/// Google Cloud Speech-to-Text client (synchronous `speech:recognize`)
pub struct SpeechClient {
    config: SpeechConfig,
    tokens: Arc<TokenProvider>,
    client: reqwest::Client,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig, tokens: Arc<TokenProvider>, client: reqwest::Client) -> Self {
        Self {
            config,
            tokens,
            client,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/speech:recognize",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    /// Send audio for recognition, returning the first transcript if any
    pub async fn recognize(&self, audio: &[u8]) -> anyhow::Result<Option<String>> {
        let format = AudioFormat::probe(audio, self.config.sample_rate_hertz);

        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16".to_string(),
                sample_rate_hertz: format.sample_rate,
                audio_channel_count: format.channels,
                language_code: self.config.language_code.clone(),
            },
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio),
            },
        };

        let token = self.tokens.access_token().await?;

        debug!(
            "Sending {} bytes for recognition ({:?}, {}Hz, {}ch, {})",
            audio.len(),
            format.encoding,
            format.sample_rate,
            format.channels,
            self.config.language_code
        );

        let resp = self
            .client
            .post(self.url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .context("Speech request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Speech API error {status}: {body}");
        }

        let body: RecognizeResponse = resp.json().await.context("Invalid Speech API response")?;

        Ok(body.first_transcript().map(|alt| {
            debug!("Best alternative confidence: {:?}", alt.confidence);
            alt.transcript.clone()
        }))
    }
}

#[async_trait::async_trait]
impl Transcriber for SpeechClient {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        match self.recognize(audio).await {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Err(AssistantError::NoTranscription),
            Err(e) => Err(AssistantError::Transcription(e)),
        }
    }

    fn name(&self) -> &str {
        "google-speech"
    }
}
