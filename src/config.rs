use crate::google::ServiceAccountKey;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Service-account fields read from `GOOGLE_CREDENTIALS_<FIELD>` variables
const CREDENTIAL_FIELDS: [&str; 11] = [
    "type",
    "project_id",
    "private_key_id",
    "private_key",
    "client_email",
    "client_id",
    "auth_uri",
    "token_uri",
    "auth_provider_x509_cert_url",
    "client_x509_cert_url",
    "universe_domain",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub google: GoogleConfig,
    pub generation: GenerationConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
    /// Largest accepted request body (audio uploads)
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Inline service-account key
    pub credentials: Option<ServiceAccountKey>,
    /// Path to a service-account JSON key, used when no inline key is set
    pub credentials_file: Option<String>,
    pub speech: SpeechConfig,
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    pub endpoint: String,
    pub language_code: String,
    /// Assumed for raw PCM uploads without a WAV header
    pub sample_rate_hertz: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    pub endpoint: String,
    pub language_code: String,
    pub ssml_gender: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationConfig {
    /// Keep only the most recent exchanges (unbounded when unset)
    pub max_exchanges: Option<usize>,
}

impl Config {
    /// Load from defaults, an optional file at `path`, and the process environment
    pub fn load(path: &str) -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(path, vars)
    }

    /// Same as `load`, reading environment variables from `vars`
    pub fn load_with_env(path: &str, vars: HashMap<String, String>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("service.name", "vocal-assistant")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8000)?
            .set_default("service.http.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("google.speech.endpoint", "https://speech.googleapis.com")?
            .set_default("google.speech.language_code", "fr-FR")?
            .set_default("google.speech.sample_rate_hertz", 16000)?
            .set_default("google.synthesis.endpoint", "https://texttospeech.googleapis.com")?
            .set_default("google.synthesis.language_code", "fr-FR")?
            .set_default("google.synthesis.ssml_gender", "FEMALE")?
            .set_default(
                "generation.endpoint",
                "https://generativelanguage.googleapis.com",
            )?
            .set_default("generation.model", "models/gemini-1.5-pro-latest")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("VOCAL_ASSISTANT")
                    .prefix_separator("__")
                    .separator("__")
                    .source(Some(vars.clone())),
            );

        // Flat variables used by the deployment environment
        builder = builder
            .set_override_option("service.http.port", vars.get("PORT").cloned())?
            .set_override_option("generation.api_key", vars.get("GENAI_API_KEY").cloned())?
            .set_override_option(
                "google.credentials_file",
                vars.get("GOOGLE_APPLICATION_CREDENTIALS").cloned(),
            )?;

        for field in CREDENTIAL_FIELDS {
            let var = format!("GOOGLE_CREDENTIALS_{}", field.to_uppercase());
            builder = builder.set_override_option(
                format!("google.credentials.{}", field),
                vars.get(&var).cloned(),
            )?;
        }

        let settings = builder.build().context("Failed to build configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.http.bind, self.service.http.port)
    }
}
