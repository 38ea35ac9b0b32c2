//! Translation pipeline — shared state + debounced-input orchestrator.
//!
//! # Architecture
//!
//! ```text
//! debounced text (mpsc)
//!        │
//!        ▼
//! TranslationOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ blank     → clear translation / error
//!        └─ non-blank → LanguageService::translate (spawned, generation-tagged)
//!
//! SharedState (Arc<Mutex<AppState>>) ←─── read by egui update() each frame
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use realtime_translator::api::{GeminiClient, LanguageService};
//! use realtime_translator::config::AppConfig;
//! use realtime_translator::pipeline::{new_shared_state, TranslationOrchestrator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let shared_state = new_shared_state();
//!     let service: Arc<dyn LanguageService> =
//!         Arc::new(GeminiClient::from_config(&config.api));
//!
//!     let (debounced_tx, debounced_rx) = mpsc::channel(16);
//!     let orchestrator = TranslationOrchestrator::new(shared_state.clone(), service);
//!     tokio::spawn(orchestrator.run(debounced_rx));
//!
//!     // debounced_tx is fed by the debouncer task
//!     # drop(debounced_tx);
//! }
//! ```

pub mod orchestrator;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use orchestrator::TranslationOrchestrator;
pub use state::{new_shared_state, AppState, SharedState};
