//! Real-time English→Korean translator with spoken playback.
//!
//! Library crate backing the `realtime-translator` binary.  The modules
//! mirror the pipeline:
//!
//! * [`config`]   — TOML settings on disk plus platform paths.
//! * [`debounce`] — trailing-edge debouncer for keystroke streams.
//! * [`api`]      — Gemini `generateContent` client (translation + TTS).
//! * [`audio`]    — base64 PCM16 decoding and speaker playback.
//! * [`pipeline`] — shared UI state and the translation orchestrator.
//! * [`app`]      — the egui window.

pub mod api;
pub mod app;
pub mod audio;
pub mod config;
pub mod debounce;
pub mod pipeline;
