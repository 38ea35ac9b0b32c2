//! Serde wire types for the Gemini `generateContent` REST endpoint.
//!
//! Only the fields this application actually sends and reads are modelled;
//! everything else in the API surface is ignored on deserialisation.  Field
//! names follow the REST API's camelCase JSON.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Top-level `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

/// Generation settings — used here only to request the AUDIO modality with a
/// fixed prebuilt voice for TTS calls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

impl GenerateContentRequest {
    /// Build a plain text-in/text-out request (translation).
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
            generation_config: None,
        }
    }

    /// Build a speech-synthesis request: AUDIO response modality with the
    /// given prebuilt voice.
    pub fn speech(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: text.into() }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.into(),
                        },
                    },
                }),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Top-level `generateContent` response body.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: ResponseContent,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// One response part — either plain text or inline binary data, depending on
/// the requested modality.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

/// Base64-encoded binary payload (raw PCM16 for AUDIO responses).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

impl GenerateContentResponse {
    /// The text of the first candidate's first text part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }

    /// The base64 audio payload of the first candidate's first part, if any.
    pub fn first_audio_data(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .first()?
            .inline_data
            .as_ref()
            .map(|d| d.data.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_request_serialises_without_generation_config() {
        let req = GenerateContentRequest::text("translate me");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "translate me");
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn speech_request_serialises_audio_modality_and_voice() {
        let req = GenerateContentRequest::speech("안녕하세요", "Kore");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "안녕하세요");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn response_first_text_reads_first_candidate() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "안녕하세요 " } ] } }
            ]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_text(), Some("안녕하세요 "));
        assert!(resp.first_audio_data().is_none());
    }

    #[test]
    fn response_first_audio_data_reads_inline_data() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [
                    { "inlineData": { "mimeType": "audio/L16;rate=24000", "data": "AAAA" } }
                ] } }
            ]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_audio_data(), Some("AAAA"));
        assert!(resp.first_text().is_none());
    }

    #[test]
    fn empty_response_yields_neither_text_nor_audio() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.first_text().is_none());
        assert!(resp.first_audio_data().is_none());
    }

    #[test]
    fn unknown_response_fields_are_ignored() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "ok" } ], "role": "model" },
                  "finishReason": "STOP" }
            ],
            "usageMetadata": { "totalTokenCount": 12 }
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_text(), Some("ok"));
    }
}
