//! Playback controller — sequences decode → play with a busy gate.
//!
//! [`PlaybackController`] drives the speak state machine:
//!
//! ```text
//! Idle ──speak()──▶ Decoding ──decode ok──▶ Playing ──ended──▶ Idle
//!                      │                        │
//!                      └──error──▶ Failed ──────┴──error──▶ Failed ──▶ Idle
//! ```
//!
//! At most one playback session is active at a time: `speak` while busy is
//! rejected with [`SpeakOutcome::Busy`] (not queued) and leaves the
//! in-flight session untouched.  There is no cancellation — once playing,
//! audio runs to natural completion.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::decoder::{decode_pcm16, DecodeError};
use super::output::{AudioSink, OutputError};

// ---------------------------------------------------------------------------
// PlaybackState
// ---------------------------------------------------------------------------

/// States of one speak lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No playback in progress; `speak` will be accepted.
    Idle,
    /// The base64 payload is being decoded to f32 PCM.
    Decoding,
    /// Audio is playing on the output device.
    Playing,
    /// A decode or output error occurred; transitions to `Idle` immediately.
    Failed,
}

impl PlaybackState {
    /// Returns `true` while a speak request is in flight.
    ///
    /// The UI uses this to disable the speak button.
    ///
    /// ```
    /// use realtime_translator::audio::PlaybackState;
    ///
    /// assert!(!PlaybackState::Idle.is_busy());
    /// assert!(PlaybackState::Decoding.is_busy());
    /// assert!(PlaybackState::Playing.is_busy());
    /// assert!(!PlaybackState::Failed.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, PlaybackState::Decoding | PlaybackState::Playing)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Idle
    }
}

// ---------------------------------------------------------------------------
// SpeakOutcome / PlaybackError
// ---------------------------------------------------------------------------

/// Result of an accepted-or-rejected speak request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// The payload was decoded and played to completion.
    Played,
    /// Another session was active; this request was a no-op.
    Busy,
}

/// Errors surfaced by [`PlaybackController::speak`].
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Output(#[from] OutputError),

    /// The blocking playback task panicked or was aborted.
    #[error("internal playback error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// PlaybackController
// ---------------------------------------------------------------------------

/// Owns the output sink and guarantees at most one active playback session.
///
/// Cheap to share (`Arc` the controller, or clone it — the state is behind
/// an `Arc<Mutex<_>>`).  The busy gate at `speak` entry is the only
/// synchronization needed: state is mutated only between await points, so
/// two concurrent `speak` calls cannot both observe `Idle`.
#[derive(Clone)]
pub struct PlaybackController {
    state: Arc<Mutex<PlaybackState>>,
    sink: Arc<dyn AudioSink>,
    /// Sample rate the TTS payload is decoded at (the service sends 24 kHz).
    sample_rate: u32,
    /// Channel count of the TTS payload (the service sends mono).
    channels: u16,
}

impl PlaybackController {
    /// Create a controller that decodes payloads at `sample_rate`/`channels`
    /// and plays them through `sink`.
    pub fn new(sink: Arc<dyn AudioSink>, sample_rate: u32, channels: u16) -> Self {
        Self {
            state: Arc::new(Mutex::new(PlaybackState::Idle)),
            sink,
            sample_rate,
            channels,
        }
    }

    /// Returns `true` while a speak request is decoding or playing.
    pub fn is_speaking(&self) -> bool {
        self.state.lock().unwrap().is_busy()
    }

    /// Decode the base64 PCM16 `payload` and play it to completion.
    ///
    /// * Busy (already decoding or playing): returns `Ok(SpeakOutcome::Busy)`
    ///   without touching the active session.
    /// * Decode or output failure: the state passes through `Failed` back to
    ///   `Idle` and the error is returned for the caller to surface.
    ///
    /// Playback itself is blocking and runs on the tokio blocking pool; this
    /// future resolves when the audio has finished.
    pub async fn speak(&self, payload: &str) -> Result<SpeakOutcome, PlaybackError> {
        // Busy gate — the whole check-and-claim is one critical section.
        {
            let mut st = self.state.lock().unwrap();
            if *st != PlaybackState::Idle {
                log::debug!("playback: speak rejected, session already active");
                return Ok(SpeakOutcome::Busy);
            }
            *st = PlaybackState::Decoding;
        }

        let decoded = match decode_pcm16(payload, self.sample_rate, self.channels) {
            Ok(audio) => audio,
            Err(e) => {
                log::error!("playback: decode failed: {e}");
                self.fail();
                return Err(e.into());
            }
        };

        log::debug!(
            "playback: decoded {} frames ({:.2}s) @ {} Hz",
            decoded.frames(),
            decoded.duration_secs(),
            decoded.sample_rate
        );

        self.set_state(PlaybackState::Playing);

        let sink = Arc::clone(&self.sink);
        let played = tokio::task::spawn_blocking(move || sink.play(&decoded)).await;

        match played {
            Ok(Ok(())) => {
                self.set_state(PlaybackState::Idle);
                Ok(SpeakOutcome::Played)
            }
            Ok(Err(e)) => {
                log::error!("playback: output failed: {e}");
                self.fail();
                Err(e.into())
            }
            Err(e) => {
                log::error!("playback: blocking task failed: {e}");
                self.fail();
                Err(PlaybackError::Internal(e.to_string()))
            }
        }
    }

    fn set_state(&self, state: PlaybackState) {
        *self.state.lock().unwrap() = state;
    }

    /// Error path: pass through `Failed`, then settle back to `Idle` so the
    /// next speak request is accepted.
    fn fail(&self) {
        let mut st = self.state.lock().unwrap();
        *st = PlaybackState::Failed;
        *st = PlaybackState::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Mock sink that counts plays, optionally blocking or failing.
    struct MockSink {
        plays: AtomicUsize,
        block_for: Duration,
        fail_with: Option<OutputError>,
    }

    impl MockSink {
        fn instant() -> Self {
            Self {
                plays: AtomicUsize::new(0),
                block_for: Duration::ZERO,
                fail_with: None,
            }
        }

        fn slow(block_for: Duration) -> Self {
            Self {
                block_for,
                ..Self::instant()
            }
        }

        fn failing(error: OutputError) -> Self {
            Self {
                fail_with: Some(error),
                ..Self::instant()
            }
        }

        fn play_count(&self) -> usize {
            self.plays.load(Ordering::SeqCst)
        }
    }

    impl AudioSink for MockSink {
        fn play(&self, _audio: &super::super::decoder::DecodedAudio) -> Result<(), OutputError> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            if !self.block_for.is_zero() {
                std::thread::sleep(self.block_for);
            }
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// A small valid payload: four mono frames of silence.
    fn silence_payload() -> String {
        let bytes: Vec<u8> = [0i16; 4].iter().flat_map(|s| s.to_le_bytes()).collect();
        BASE64.encode(bytes)
    }

    fn controller_with(sink: Arc<MockSink>) -> PlaybackController {
        PlaybackController::new(sink, 24_000, 1)
    }

    /// Spin until `is_speaking` matches `expected` (bounded wait).
    async fn wait_for_speaking(controller: &PlaybackController, expected: bool) {
        for _ in 0..200 {
            if controller.is_speaking() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("is_speaking never became {expected}");
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// A single speak request decodes, plays once, and returns to Idle.
    #[tokio::test]
    async fn speak_plays_once_and_returns_to_idle() {
        let sink = Arc::new(MockSink::instant());
        let controller = controller_with(Arc::clone(&sink));

        let outcome = controller.speak(&silence_payload()).await.unwrap();

        assert_eq!(outcome, SpeakOutcome::Played);
        assert_eq!(sink.play_count(), 1);
        assert!(!controller.is_speaking());
    }

    /// A second speak while one is active is rejected as Busy and the first
    /// session runs to completion with exactly one playback.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_speak_is_rejected_as_busy() {
        let sink = Arc::new(MockSink::slow(Duration::from_millis(100)));
        let controller = controller_with(Arc::clone(&sink));

        let first = {
            let controller = controller.clone();
            let payload = silence_payload();
            tokio::spawn(async move { controller.speak(&payload).await })
        };

        wait_for_speaking(&controller, true).await;

        // Second request while the first is still playing.
        let second = controller.speak(&silence_payload()).await.unwrap();
        assert_eq!(second, SpeakOutcome::Busy);

        // The rejected call must not have disturbed the active session.
        let first = first.await.unwrap().unwrap();
        assert_eq!(first, SpeakOutcome::Played);
        assert_eq!(sink.play_count(), 1);
        assert!(!controller.is_speaking());
    }

    /// `is_speaking` is observable while the sink is playing.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn is_speaking_during_playback() {
        let sink = Arc::new(MockSink::slow(Duration::from_millis(80)));
        let controller = controller_with(sink);

        let task = {
            let controller = controller.clone();
            let payload = silence_payload();
            tokio::spawn(async move { controller.speak(&payload).await })
        };

        wait_for_speaking(&controller, true).await;
        task.await.unwrap().unwrap();
        assert!(!controller.is_speaking());
    }

    /// An invalid payload fails at the decode stage: the sink is never
    /// touched and the controller settles back to Idle.
    #[tokio::test]
    async fn decode_failure_surfaces_and_resets_to_idle() {
        let sink = Arc::new(MockSink::instant());
        let controller = controller_with(Arc::clone(&sink));

        let err = controller.speak("not base64!!!").await.unwrap_err();

        assert!(matches!(err, PlaybackError::Decode(_)));
        assert_eq!(sink.play_count(), 0);
        assert!(!controller.is_speaking());
    }

    /// An output failure surfaces to the caller and resets to Idle, so the
    /// next speak request is accepted again.
    #[tokio::test]
    async fn output_failure_surfaces_and_allows_retry() {
        let sink = Arc::new(MockSink::failing(OutputError::Unavailable(
            "no device".into(),
        )));
        let controller = controller_with(Arc::clone(&sink));

        let err = controller.speak(&silence_payload()).await.unwrap_err();

        assert!(matches!(err, PlaybackError::Output(_)));
        assert!(!controller.is_speaking());

        // Controller is reusable after a failure.
        let err = controller.speak(&silence_payload()).await.unwrap_err();
        assert!(matches!(err, PlaybackError::Output(_)));
        assert_eq!(sink.play_count(), 2);
    }
}
