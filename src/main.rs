//! Application entry point — Real-time Translator.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the Gemini client ([`GeminiClient`]) from config.
//! 5. Create the channel chain (`raw` → debouncer → `debounced` →
//!    orchestrator) plus the `speak` channel.
//! 6. Spawn the debouncer, the translation orchestrator and the speaker
//!    task on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use realtime_translator::{
    api::{GeminiClient, LanguageService},
    app::TranslatorApp,
    audio::{PlaybackController, RodioSink},
    config::AppConfig,
    debounce::run_debouncer,
    pipeline::{new_shared_state, SharedState, TranslationOrchestrator},
};
use tokio::sync::mpsc;

use eframe::egui;

// ---------------------------------------------------------------------------
// Speaker task
// ---------------------------------------------------------------------------

/// Listens for speak requests from the UI, synthesizes Korean speech and
/// hands the audio to the [`PlaybackController`].
///
/// The `speaking` flag covers the whole synthesize-and-play span so the UI
/// can disable the speak button while a request is in flight.  A request
/// arriving while one is active is dropped, not queued.
async fn run_speaker(
    service: Arc<dyn LanguageService>,
    controller: PlaybackController,
    state: SharedState,
    speaking: Arc<AtomicBool>,
    mut speak_rx: mpsc::Receiver<String>,
) {
    while let Some(text) = speak_rx.recv().await {
        if speaking.swap(true, Ordering::SeqCst) {
            log::debug!("speak request ignored: playback already active");
            continue;
        }

        // A new attempt clears any error from the previous one.
        state.lock().unwrap().error_message = None;

        let outcome = match service.synthesize(&text).await {
            Ok(payload) => controller
                .speak(&payload)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        if let Err(message) = outcome {
            log::error!("speak request failed: {message}");
            state.lock().unwrap().error_message = Some(message);
        }

        speaking.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (w, h) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([w, h])
        .with_min_inner_size([480.0, 320.0])
        .with_title("Real-time Translator");

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Real-time Translator starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads — translation + synthesis each
    //    take one)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // reqwest clients must be built inside the runtime context
    let _guard = rt.enter();

    // 4. Gemini client
    let service: Arc<dyn LanguageService> = Arc::new(GeminiClient::from_config(&config.api));

    // 5. Channel setup
    let (raw_tx, raw_rx) = mpsc::channel::<String>(64);
    let (debounced_tx, debounced_rx) = mpsc::channel::<String>(16);
    let (speak_tx, speak_rx) = mpsc::channel::<String>(4);

    let state = new_shared_state();
    let speaking = Arc::new(AtomicBool::new(false));

    // 6. Background tasks
    rt.spawn(run_debouncer(
        raw_rx,
        Duration::from_millis(config.debounce_ms),
        debounced_tx,
    ));

    let orchestrator = TranslationOrchestrator::new(state.clone(), Arc::clone(&service));
    rt.spawn(orchestrator.run(debounced_rx));

    let sink = Arc::new(RodioSink::new(config.audio.volume));
    let controller = PlaybackController::new(
        sink,
        config.audio.sample_rate,
        config.audio.channels,
    );
    rt.spawn(run_speaker(
        Arc::clone(&service),
        controller,
        state.clone(),
        Arc::clone(&speaking),
        speak_rx,
    ));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = TranslatorApp::new(raw_tx, speak_tx, state, speaking);
    let options = native_options(&config);

    eframe::run_native(
        "Real-time Translator",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
