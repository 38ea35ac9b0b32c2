//! Core `LanguageService` trait and `GeminiClient` implementation.
//!
//! `GeminiClient` calls the Gemini `generateContent` REST endpoint twice
//! over: once in text mode for translation and once in AUDIO mode for
//! speech synthesis.  All connection details come from [`ApiConfig`];
//! nothing is hardcoded.
//!
//! Remote failures are logged with full detail here and surfaced to callers
//! as coarse, user-safe [`ApiError`] variants whose `Display` text is shown
//! directly in the UI error banner.

use async_trait::async_trait;
use thiserror::Error;

use crate::api::prompt::translation_prompt;
use crate::api::types::{GenerateContentRequest, GenerateContentResponse};
use crate::config::ApiConfig;

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// User-facing errors for the remote language service.
///
/// The `Display` strings are the exact messages shown to the user; internal
/// causes (HTTP status, transport errors, parse failures) are logged at the
/// point of failure and never leak through this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Caller passed empty/whitespace text to an operation that requires
    /// non-empty text (synthesis only — translation short-circuits instead).
    #[error("Cannot speak empty text.")]
    InvalidInput,

    /// The translation call failed (network, auth, malformed response).
    #[error("Failed to translate text. Please check your connection or API key.")]
    Translation,

    /// The synthesis call failed (network, auth, malformed response).
    #[error("Failed to generate audio.")]
    Synthesis,

    /// Synthesis succeeded but the response carried no extractable audio.
    #[error("No audio data received from API.")]
    NoAudioData,
}

// ---------------------------------------------------------------------------
// LanguageService trait
// ---------------------------------------------------------------------------

/// Async trait for the remote translation / text-to-speech service.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn LanguageService>`).  Both operations are a
/// single remote attempt with no client-side retry; the network call is the
/// only suspension point.
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Translate English `text` to Korean.
    ///
    /// Trimmed-empty input returns `Ok("")` immediately with no network
    /// call, so clearing the input never produces a spurious request.
    async fn translate(&self, text: &str) -> Result<String, ApiError>;

    /// Synthesize `text` to speech; returns the base64-encoded raw PCM16
    /// payload (24 kHz mono) from the response.
    ///
    /// Trimmed-empty input fails with [`ApiError::InvalidInput`] — unlike
    /// translation, synthesis has no sensible empty output.
    async fn synthesize(&self, text: &str) -> Result<String, ApiError>;
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Calls the Gemini `generateContent` REST endpoint.
///
/// # No hardcoded URLs
/// All connection details (`base_url`, API key, model identifiers, voice)
/// come exclusively from the [`ApiConfig`] passed to
/// [`GeminiClient::from_config`].
pub struct GeminiClient {
    client: reqwest::Client,
    config: ApiConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Build a `GeminiClient` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).  The API key is resolved once at construction.
    pub fn from_config(config: &ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            log::warn!("api: no API key configured — remote calls will fail");
        }

        Self {
            client,
            config: config.clone(),
            api_key,
        }
    }

    /// POST a `generateContent` request to `model` and parse the response.
    ///
    /// The API key travels in the `x-goog-api-key` header so it never
    /// appears in logged URLs.
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        );

        let mut req = self.client.post(&url).json(request);
        if let Some(key) = self.api_key.as_deref() {
            req = req.header("x-goog-api-key", key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| format!("request to {model} failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("{model} returned HTTP {status}: {body}"));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| format!("failed to parse {model} response: {e}"))
    }
}

#[async_trait]
impl LanguageService for GeminiClient {
    async fn translate(&self, text: &str) -> Result<String, ApiError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let request = GenerateContentRequest::text(translation_prompt(text));

        let response = self
            .generate(&self.config.translation_model, &request)
            .await
            .map_err(|detail| {
                log::error!("translation failed: {detail}");
                ApiError::Translation
            })?;

        match response.first_text() {
            Some(translated) => Ok(translated.trim().to_string()),
            None => {
                log::error!("translation response contained no text part");
                Err(ApiError::Translation)
            }
        }
    }

    async fn synthesize(&self, text: &str) -> Result<String, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::InvalidInput);
        }

        let request = GenerateContentRequest::speech(text, &self.config.voice);

        let response = self
            .generate(&self.config.tts_model, &request)
            .await
            .map_err(|detail| {
                log::error!("speech synthesis failed: {detail}");
                ApiError::Synthesis
            })?;

        match response.first_audio_data() {
            Some(data) => Ok(data.to_string()),
            None => {
                log::error!("synthesis response contained no inline audio data");
                Err(ApiError::NoAudioData)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MockService — test double used by orchestrator and playback tests
// ---------------------------------------------------------------------------

/// Canned-response `LanguageService` used in tests.
#[cfg(test)]
pub struct MockService {
    translation: Result<String, ApiError>,
    audio: Result<String, ApiError>,
}

#[cfg(test)]
impl MockService {
    /// A mock whose `translate` always succeeds with `translation`.
    pub fn translating(translation: &str) -> Self {
        Self {
            translation: Ok(translation.to_string()),
            audio: Err(ApiError::Synthesis),
        }
    }

    /// A mock whose `translate` always fails with the given error.
    pub fn failing(error: ApiError) -> Self {
        Self {
            translation: Err(error.clone()),
            audio: Err(error),
        }
    }

    /// A mock whose `synthesize` always succeeds with `audio` (base64).
    pub fn synthesizing(audio: &str) -> Self {
        Self {
            translation: Err(ApiError::Translation),
            audio: Ok(audio.to_string()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LanguageService for MockService {
    async fn translate(&self, text: &str) -> Result<String, ApiError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        self.translation.clone()
    }

    async fn synthesize(&self, text: &str) -> Result<String, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::InvalidInput);
        }
        self.audio.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
