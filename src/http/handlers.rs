use super::error::ErrorResponse;
use super::state::AppState;
use crate::error::AssistantError;
use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Multipart field carrying the audio upload
const FILE_FIELD: &str = "file";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    /// Question (generate) or text to speak (TTS)
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Non-empty `text` from a JSON body; unreadable bodies count as missing text
fn required_text(payload: Result<Json<TextRequest>, JsonRejection>) -> Result<String, AssistantError> {
    match payload {
        Ok(Json(TextRequest { text: Some(text) })) if !text.trim().is_empty() => Ok(text),
        Ok(_) => Err(AssistantError::missing_text()),
        Err(rejection) => {
            warn!("Unreadable JSON body: {}", rejection);
            Err(AssistantError::missing_text())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(MessageResponse {
        message: "Hello World".to_string(),
    })
}

/// POST /transcribe
/// Transcribe the audio uploaded in the `file` multipart field
pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            warn!("Not a multipart request: {}", rejection);
            return AssistantError::missing_file().into_response();
        }
    };

    // Find the file field, skipping anything else
    let audio = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(FILE_FIELD) => match field.bytes().await {
                Ok(bytes) => break bytes,
                Err(e) => {
                    warn!("Failed to read uploaded file: {}", e);
                    return (
                        e.status(),
                        Json(ErrorResponse {
                            error: e.body_text(),
                        }),
                    )
                        .into_response();
                }
            },
            Ok(Some(_)) => continue,
            Ok(None) => return AssistantError::missing_file().into_response(),
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return AssistantError::missing_file().into_response();
            }
        }
    };

    info!("Received {} bytes of audio", audio.len());

    match state.assistant.transcribe(&audio).await {
        Ok(text) => Json(TextResponse { text }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /generate-response
/// Answer a question with the conversation history as context
pub async fn generate_response(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<TextResponse>, AssistantError> {
    let question = required_text(payload)?;

    info!("Generating response for a {} char question", question.chars().count());

    let text = state.assistant.respond(&question).await?;

    Ok(Json(TextResponse { text }))
}

/// POST /text-to-speech
/// Synthesize text and return it as an MP3 attachment
pub async fn text_to_speech(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Response, AssistantError> {
    let text = required_text(payload)?;

    let audio = state.assistant.speak(&text).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"response.mp3\"",
            ),
        ],
        audio,
    )
        .into_response())
}

/// DELETE /reset-conversation
pub async fn reset_conversation(State(state): State<AppState>) -> impl IntoResponse {
    state.assistant.reset().await;

    Json(MessageResponse {
        message: "Historique de conversation réinitialisé".to_string(),
    })
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
