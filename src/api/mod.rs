//! Remote language service client — translation and text-to-speech.
//!
//! This module provides:
//! * [`LanguageService`] — async trait implemented by all service backends.
//! * [`GeminiClient`] — Gemini `generateContent` REST client.
//! * [`translation_prompt`] — fixed EN→KO prompt template.
//! * [`ApiError`] — coarse, user-safe error variants.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use realtime_translator::api::{GeminiClient, LanguageService};
//! use realtime_translator::config::ApiConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = GeminiClient::from_config(&ApiConfig::default());
//!
//!     let korean = client.translate("Good morning").await.unwrap();
//!     println!("{korean}");
//!
//!     // base64-encoded raw PCM16 @ 24 kHz mono
//!     let payload = client.synthesize(&korean).await.unwrap();
//!     println!("{} bytes of base64 audio", payload.len());
//! }
//! ```

pub mod client;
pub mod prompt;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiError, GeminiClient, LanguageService};
pub use prompt::translation_prompt;
pub use types::{GenerateContentRequest, GenerateContentResponse};

// test-only re-export so pipeline tests can import MockService without
// `use realtime_translator::api::client::MockService`.
#[cfg(test)]
pub use client::MockService;
