//! Two-panel translator window — egui/eframe application.
//!
//! # Architecture
//!
//! [`TranslatorApp`] is the top-level [`eframe::App`].  It owns only UI
//! plumbing; all real work happens in background tasks reached through a
//! narrow boundary:
//!
//! * `raw_tx`   — every keystroke pushes the full English text to the
//!   debouncer task.
//! * `speak_tx` — the speak button sends the current Korean text to the
//!   speaker task (synthesize → decode → play).
//! * `state`    — [`SharedState`] written by the orchestrator, read here
//!   each frame (translation, loading flag, error banner text).
//! * `speaking` — atomic flag owned by the speaker task; disables the speak
//!   button for the whole synthesize-and-play span.
//!
//! # Layout
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │           Real-time Translator                │
//! │                 [ Clear ]                     │
//! │ ┌── English ────────┐ ┌── Korean ────── 🔊 ──┐│
//! │ │ (editable)        │ │ (read-only, spinner  ││
//! │ │                   │ │  while translating)  ││
//! │ └───────────────────┘ └──────────────────────┘│
//! │ [ error banner, when an error is surfaced ]   │
//! └───────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::pipeline::SharedState;

// ---------------------------------------------------------------------------
// TranslatorApp
// ---------------------------------------------------------------------------

/// eframe application — the translator window.
pub struct TranslatorApp {
    // ── Input ────────────────────────────────────────────────────────────
    /// English source text bound to the left panel.
    english_text: String,
    /// The last value pushed into the debouncer, to avoid re-sending an
    /// unchanged buffer every frame.
    last_pushed: String,

    // ── Boundary to the background tasks ─────────────────────────────────
    /// Raw keystroke values → debouncer task.
    raw_tx: mpsc::Sender<String>,
    /// Korean text to speak → speaker task.
    speak_tx: mpsc::Sender<String>,
    /// Translation state written by the orchestrator.
    state: SharedState,
    /// True for the whole synthesize-and-play span of a speak request.
    speaking: Arc<AtomicBool>,
}

impl TranslatorApp {
    /// Create a new [`TranslatorApp`].
    ///
    /// * `raw_tx`   — sender feeding the debouncer task.
    /// * `speak_tx` — sender feeding the speaker task.
    /// * `state`    — shared translation state.
    /// * `speaking` — speaker-task busy flag.
    pub fn new(
        raw_tx: mpsc::Sender<String>,
        speak_tx: mpsc::Sender<String>,
        state: SharedState,
        speaking: Arc<AtomicBool>,
    ) -> Self {
        Self {
            english_text: String::new(),
            last_pushed: String::new(),
            raw_tx,
            speak_tx,
            state,
            speaking,
        }
    }

    // ── Boundary plumbing ────────────────────────────────────────────────

    /// Push the input text to the debouncer when it changed this frame.
    ///
    /// `last_pushed` advances only on a successful send — if the channel is
    /// momentarily full, the same text is retried on the next frame rather
    /// than silently lost.
    fn push_input_if_changed(&mut self) {
        if self.english_text != self.last_pushed
            && self.raw_tx.try_send(self.english_text.clone()).is_ok()
        {
            self.last_pushed = self.english_text.clone();
        }
    }

    /// Reset both panels and any surfaced error.
    fn clear_all(&mut self) {
        self.english_text.clear();
        self.last_pushed.clear();
        // Tell the orchestrator the input is blank so in-flight responses
        // are invalidated, then wipe the visible state immediately.
        let _ = self.raw_tx.try_send(String::new());
        self.state.lock().unwrap().clear();
    }

    // ── Panels ───────────────────────────────────────────────────────────

    fn draw_english_panel(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(egui::RichText::new("English").strong());
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("english")
                .show(ui, |ui| {
                    ui.add_sized(
                        ui.available_size(),
                        egui::TextEdit::multiline(&mut self.english_text)
                            .hint_text("Start typing here...")
                            .frame(false),
                    );
                });
        });
    }

    fn draw_korean_panel(
        &mut self,
        ui: &mut egui::Ui,
        translation: &str,
        is_loading: bool,
        is_speaking: bool,
    ) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Korean").strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let can_speak = !translation.is_empty() && !is_speaking;
                    let speak_label = if is_speaking { "…" } else { "Speak" };
                    if ui
                        .add_enabled(can_speak, egui::Button::new(speak_label))
                        .clicked()
                    {
                        let _ = self.speak_tx.try_send(translation.to_string());
                    }
                });
            });
            ui.separator();

            if is_loading {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Spinner::new());
                });
                return;
            }

            egui::ScrollArea::vertical().id_salt("korean").show(ui, |ui| {
                let shown = if translation.is_empty() {
                    egui::RichText::new("Translation will appear here...").weak()
                } else {
                    egui::RichText::new(translation).size(16.0)
                };
                ui.add_sized(ui.available_size(), egui::Label::new(shown).wrap());
            });
        });
    }

    fn draw_error_banner(ui: &mut egui::Ui, message: &str) {
        egui::Frame::new()
            .fill(egui::Color32::from_rgb(120, 40, 40))
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Error").strong().color(egui::Color32::WHITE));
                ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
            });
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for TranslatorApp {
    /// Called every frame by eframe.  Pushes input changes, snapshots the
    /// shared state, then renders the two panels.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.push_input_if_changed();

        // Snapshot shared state under a short lock; never hold it while
        // rendering.
        let (translation, is_loading, error_message) = {
            let st = self.state.lock().unwrap();
            (st.translation.clone(), st.is_loading, st.error_message.clone())
        };
        let is_speaking = self.speaking.load(Ordering::SeqCst);

        // Background tasks mutate state without waking the UI — poll.
        ctx.request_repaint_after(Duration::from_millis(100));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Real-time Translator");
                ui.label(egui::RichText::new("English to Korean").weak());
            });
            ui.add_space(4.0);

            ui.vertical_centered(|ui| {
                let can_clear = !self.english_text.is_empty() || !translation.is_empty();
                if ui.add_enabled(can_clear, egui::Button::new("Clear")).clicked() {
                    self.clear_all();
                }
            });
            ui.add_space(6.0);

            let panel_height = ui.available_height() - if error_message.is_some() { 70.0 } else { 8.0 };
            ui.allocate_ui(egui::vec2(ui.available_width(), panel_height), |ui| {
                ui.columns(2, |columns| {
                    self.draw_english_panel(&mut columns[0]);
                    self.draw_korean_panel(&mut columns[1], &translation, is_loading, is_speaking);
                });
            });

            if let Some(ref message) = error_message {
                ui.add_space(6.0);
                Self::draw_error_banner(ui, message);
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("translator window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::new_shared_state;

    fn make_app(raw_capacity: usize) -> (TranslatorApp, mpsc::Receiver<String>) {
        let (raw_tx, raw_rx) = mpsc::channel(raw_capacity);
        let (speak_tx, _speak_rx) = mpsc::channel(4);
        let app = TranslatorApp::new(
            raw_tx,
            speak_tx,
            new_shared_state(),
            Arc::new(AtomicBool::new(false)),
        );
        (app, raw_rx)
    }

    /// Changed text is pushed once; an unchanged buffer is not re-sent on
    /// subsequent frames.
    #[test]
    fn changed_text_is_pushed_once() {
        let (mut app, mut raw_rx) = make_app(4);

        app.english_text = "hello".into();
        app.push_input_if_changed();
        app.push_input_if_changed();

        assert_eq!(raw_rx.try_recv().unwrap(), "hello");
        assert!(raw_rx.try_recv().is_err());
    }

    /// A send that fails because the channel is full must be retried on the
    /// next frame — `last_pushed` only advances on a successful send.
    #[test]
    fn full_channel_retries_on_next_frame() {
        let (mut app, mut raw_rx) = make_app(1);

        app.english_text = "first".into();
        app.push_input_if_changed();

        // Channel (capacity 1) is now full; this push cannot go through.
        app.english_text = "second".into();
        app.push_input_if_changed();
        assert_eq!(app.last_pushed, "first");

        // Next frame, after the debouncer drained the channel.
        assert_eq!(raw_rx.try_recv().unwrap(), "first");
        app.push_input_if_changed();

        assert_eq!(app.last_pushed, "second");
        assert_eq!(raw_rx.try_recv().unwrap(), "second");
    }
}
