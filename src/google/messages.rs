use serde::{Deserialize, Serialize};

// ============================================================================
// Speech-to-Text (speech:recognize)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeRequest {
    pub config: RecognitionConfig,
    pub audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub encoding: String,
    pub sample_rate_hertz: u32,
    pub audio_channel_count: u16,
    pub language_code: String,
}

#[derive(Debug, Serialize)]
pub struct RecognitionAudio {
    /// Base64-encoded audio bytes
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecognizeResponse {
    /// Absent when nothing was recognized
    #[serde(default)]
    pub results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RecognizeResponse {
    /// First alternative of the first result, if any
    pub fn first_transcript(&self) -> Option<&RecognitionAlternative> {
        self.results.first()?.alternatives.first()
    }
}

// ============================================================================
// Gemini (generateContent)
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ============================================================================
// Text-to-Speech (text:synthesize)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelectionParams,
    pub audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
pub struct SynthesisInput {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionParams {
    pub language_code: String,
    pub ssml_gender: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeResponse {
    /// Base64-encoded audio bytes
    pub audio_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_response_without_results() {
        let resp: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.first_transcript().is_none());
    }

    #[test]
    fn test_recognize_response_first_alternative() {
        let json = r#"{
            "results": [
                {"alternatives": [
                    {"transcript": "bonjour", "confidence": 0.93},
                    {"transcript": "bon jour"}
                ]},
                {"alternatives": [{"transcript": "ignored"}]}
            ]
        }"#;

        let resp: RecognizeResponse = serde_json::from_str(json).unwrap();
        let first = resp.first_transcript().unwrap();
        assert_eq!(first.transcript, "bonjour");
        assert_eq!(first.confidence, Some(0.93));
    }

    #[test]
    fn test_generate_content_text_joins_parts() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Il est "}, {"text": "midi."}]},
                "finishReason": "STOP"
            }]
        }"#;

        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text().as_deref(), Some("Il est midi."));
    }

    #[test]
    fn test_generate_content_blocked_prompt() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;

        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert!(resp.text().is_none());
        assert_eq!(
            resp.prompt_feedback.and_then(|f| f.block_reason).as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn test_synthesize_request_field_names() {
        let req = SynthesizeRequest {
            input: SynthesisInput {
                text: "Bonjour".to_string(),
            },
            voice: VoiceSelectionParams {
                language_code: "fr-FR".to_string(),
                ssml_gender: "FEMALE".to_string(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3".to_string(),
            },
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["voice"]["languageCode"], "fr-FR");
        assert_eq!(json["voice"]["ssmlGender"], "FEMALE");
        assert_eq!(json["audioConfig"]["audioEncoding"], "MP3");
    }
}
