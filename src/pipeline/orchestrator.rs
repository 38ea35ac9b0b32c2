//! Translation orchestrator — reacts to debounced input values.
//!
//! [`TranslationOrchestrator`] owns the [`SharedState`] and responds to
//! debounced text values received over a `tokio::sync::mpsc` channel.
//!
//! # Flow
//!
//! ```text
//! debounced value
//!   ├─ blank        → clear translation + error synchronously
//!   └─ non-blank    → bump generation, loading = true,
//!                     spawn translate(text) tagged with its generation
//!                       ├─ generation still current → write result/error,
//!                       │                             loading = false
//!                       └─ generation superseded    → discard (stale)
//! ```
//!
//! # Stale responses
//!
//! Because the debounce can fire for a new value while a prior call is still
//! outstanding, every in-flight call is keyed to the generation counter
//! value it was issued under.  A response whose generation no longer matches
//! the counter is discarded without touching state, so an older, slower
//! response can never overwrite a newer result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::LanguageService;

use super::state::SharedState;

// ---------------------------------------------------------------------------
// TranslationOrchestrator
// ---------------------------------------------------------------------------

/// Drives translation requests off the debounced input stream.
///
/// Create with [`TranslationOrchestrator::new`], then call
/// [`run`](Self::run) inside a tokio task.
pub struct TranslationOrchestrator {
    state: SharedState,
    service: Arc<dyn LanguageService>,
    /// Monotonic request generation; the latest debounced value owns the
    /// current generation.
    generation: Arc<AtomicU64>,
}

impl TranslationOrchestrator {
    /// Create a new orchestrator.
    ///
    /// * `state`   — shared translation state (also read by the UI).
    /// * `service` — remote language service (e.g. `GeminiClient`).
    pub fn new(state: SharedState, service: Arc<dyn LanguageService>) -> Self {
        Self {
            state,
            service,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run the orchestrator until `debounced_rx` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task from
    /// `main()`.  Translate calls are spawned, not awaited, so a slow remote
    /// call never delays handling of the next debounced value.
    pub async fn run(self, mut debounced_rx: mpsc::Receiver<String>) {
        while let Some(text) = debounced_rx.recv().await {
            self.handle_input(text);
        }

        log::info!("orchestrator: debounced channel closed, shutting down");
    }

    /// Handle one debounced input value.
    fn handle_input(&self, text: String) {
        // Claiming a new generation invalidates every outstanding call,
        // including when the new value is blank.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if text.trim().is_empty() {
            log::debug!("orchestrator: blank input, clearing state");
            let mut st = self.state.lock().unwrap();
            st.translation.clear();
            st.error_message = None;
            st.is_loading = false;
            return;
        }

        {
            let mut st = self.state.lock().unwrap();
            st.is_loading = true;
            st.error_message = None;
        }

        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let counter = Arc::clone(&self.generation);

        tokio::spawn(async move {
            let result = service.translate(&text).await;

            // Stale-response guard: the generation check and the state write
            // must be one critical section — checking before taking the lock
            // would let a newer input bump the counter and write state in
            // between, only to be overwritten by this stale result.
            let mut st = state.lock().unwrap();
            if counter.load(Ordering::SeqCst) != generation {
                log::debug!("orchestrator: discarding stale response for {text:?}");
                return;
            }
            match result {
                Ok(translation) => {
                    log::debug!("orchestrator: translated {text:?}");
                    st.translation = translation;
                    st.error_message = None;
                }
                Err(e) => {
                    log::warn!("orchestrator: translation failed: {e}");
                    st.translation.clear();
                    st.error_message = Some(e.to_string());
                }
            }
            st.is_loading = false;
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
