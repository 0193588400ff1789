use thiserror::Error;

/// Failures surfaced by the assistant and its external service adapters.
///
/// Display strings are what callers see; upstream details stay in the
/// `source` chain and are only logged.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// A required request field is missing or empty
    #[error("{0}")]
    Validation(&'static str),

    /// The speech recognizer returned no result
    #[error("Aucune transcription obtenue")]
    NoTranscription,

    #[error("Échec de la transcription audio")]
    Transcription(#[source] anyhow::Error),

    #[error("Échec de la génération de la réponse")]
    Generation(#[source] anyhow::Error),

    #[error("Échec de la synthèse vocale")]
    Synthesis(#[source] anyhow::Error),
}

impl AssistantError {
    pub fn missing_file() -> Self {
        Self::Validation("Aucun fichier fourni")
    }

    pub fn missing_text() -> Self {
        Self::Validation("Aucun texte fourni")
    }

    /// Whether the failure was caused by the request rather than upstream
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NoTranscription)
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
