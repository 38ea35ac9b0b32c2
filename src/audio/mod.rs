//! Audio pipeline — base64 PCM16 decoding → playback controller → output sink.
//!
//! # Pipeline
//!
//! ```text
//! TTS payload (base64) → decode_pcm16 → DecodedAudio
//!                      → PlaybackController (Idle→Decoding→Playing→Idle)
//!                      → AudioSink (rodio, dedicated playback thread)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use realtime_translator::audio::{PlaybackController, RodioSink};
//!
//! # async fn example(payload: &str) {
//! let sink = Arc::new(RodioSink::new(1.0));
//! let controller = PlaybackController::new(sink, 24_000, 1);
//!
//! // payload: base64 PCM16 @ 24 kHz mono from the TTS service
//! match controller.speak(payload).await {
//!     Ok(outcome) => println!("{outcome:?}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```

pub mod controller;
pub mod decoder;
pub mod output;

pub use controller::{PlaybackController, PlaybackError, PlaybackState, SpeakOutcome};
pub use decoder::{decode_pcm16, DecodeError, DecodedAudio};
pub use output::{AudioSink, OutputError, RodioSink};
