use super::messages::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::assistant::Generator;
use crate::config::GenerationConfig;
use crate::error::{AssistantError, Result};
use anyhow::Context;
use tracing::{debug, warn};

/// Gemini client (`generateContent`, API key auth)
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig, api_key: String, client: reqwest::Client) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: model_path(&config.model),
            api_key,
            client,
        }
    }

    fn url(&self) -> String {
        format!("{}/v1beta/{}:generateContent", self.endpoint, self.model)
    }

    /// Run a single-turn generation for `prompt`
    pub async fn generate_text(&self, prompt: &str) -> anyhow::Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        debug!("Calling {} ({} byte prompt)", self.model, prompt.len());

        let resp = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {status}: {body}");
        }

        let body: GenerateContentResponse =
            resp.json().await.context("Invalid Gemini API response")?;

        if let Some(text) = body.text() {
            return Ok(text);
        }

        // No usable candidate: report why if Google said so
        let block_reason = body
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone());
        let finish_reason = body
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone());

        warn!(
            "Gemini returned no text (block_reason={:?}, finish_reason={:?})",
            block_reason, finish_reason
        );
        anyhow::bail!(
            "Gemini returned no text (block_reason={:?}, finish_reason={:?})",
            block_reason,
            finish_reason
        )
    }
}

/// Accept both `gemini-1.5-pro-latest` and `models/gemini-1.5-pro-latest`
fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[async_trait::async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_text(prompt)
            .await
            .map_err(AssistantError::Generation)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path_normalization() {
        assert_eq!(
            model_path("gemini-1.5-pro-latest"),
            "models/gemini-1.5-pro-latest"
        );
        assert_eq!(
            model_path("models/gemini-1.5-pro-latest"),
            "models/gemini-1.5-pro-latest"
        );
    }

    #[test]
    fn test_url_construction() {
        let config = GenerationConfig {
            endpoint: "https://generativelanguage.googleapis.com/".to_string(),
            model: "models/gemini-1.5-pro-latest".to_string(),
            api_key: None,
        };
        let client = GeminiClient::new(&config, "k".to_string(), reqwest::Client::new());

        assert_eq!(
            client.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro-latest:generateContent"
        );
    }
}
