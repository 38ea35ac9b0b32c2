//! Shared application state read by the UI and mutated by the orchestrator.
//!
//! [`AppState`] is the single source of truth for what the translation side
//! of the UI renders: the current Korean text, the translation-in-flight
//! flag, and the last surfaced error.  The playback side keeps its own state
//! in [`PlaybackController`](crate::audio::PlaybackController) — starting
//! playback never mutates the text, and a later translation update never
//! affects an already-started playback.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<AppState>>` — cheap to
//! clone and safe to share across tasks.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Translation state shown by the UI.
///
/// Held behind [`SharedState`].  The orchestrator mutates it; the egui
/// update loop reads it each frame.
#[derive(Debug, Default)]
pub struct AppState {
    /// The current Korean translation.  Empty when the input is blank or a
    /// translation failed.
    pub translation: String,

    /// `true` while a translation request is in flight — drives the loading
    /// overlay on the Korean panel.
    pub is_loading: bool,

    /// The last user-facing error message, shown in the error banner.
    /// `None` once a subsequent operation succeeds or the input is cleared.
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything — used by the UI's clear action.
    pub fn clear(&mut self) {
        self.translation.clear();
        self.is_loading = false;
        self.error_message = None;
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
///
/// Cheap to clone (`Arc` clone).  Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`] wrapping a default [`AppState`].
pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(AppState::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
