use super::auth::TokenProvider;
use super::messages::{
    AudioConfig, SynthesisInput, SynthesizeRequest, SynthesizeResponse, VoiceSelectionParams,
};
use crate::assistant::Synthesizer;
use crate::config::SynthesisConfig;
use crate::error::{AssistantError, Result};
use anyhow::Context;
use base64::Engine;
use std::sync::Arc;
use tracing::debug;

/// Google Cloud Text-to-Speech client, always producing MP3
pub struct TextToSpeechClient {
    config: SynthesisConfig,
    tokens: Arc<TokenProvider>,
    client: reqwest::Client,
}

impl TextToSpeechClient {
    pub fn new(
        config: SynthesisConfig,
        tokens: Arc<TokenProvider>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            tokens,
            client,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/text:synthesize",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    pub async fn synthesize_mp3(&self, text: &str) -> anyhow::Result<Vec<u8>> {
        let request = SynthesizeRequest {
            input: SynthesisInput {
                text: text.to_string(),
            },
            voice: VoiceSelectionParams {
                language_code: self.config.language_code.clone(),
                ssml_gender: self.config.ssml_gender.clone(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3".to_string(),
            },
        };

        let token = self.tokens.access_token().await?;

        debug!(
            "Synthesizing {} chars ({}, {})",
            text.chars().count(),
            self.config.language_code,
            self.config.ssml_gender
        );

        let resp = self
            .client
            .post(self.url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .context("Text-to-Speech request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Text-to-Speech API error {status}: {body}");
        }

        let body: SynthesizeResponse = resp
            .json()
            .await
            .context("Invalid Text-to-Speech API response")?;

        base64::engine::general_purpose::STANDARD
            .decode(body.audio_content)
            .context("Text-to-Speech audio is not valid base64")
    }
}

#[async_trait::async_trait]
impl Synthesizer for TextToSpeechClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.synthesize_mp3(text)
            .await
            .map_err(AssistantError::Synthesis)
    }

    fn name(&self) -> &str {
        "google-tts"
    }
}
