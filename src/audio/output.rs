//! Audio output sink — the process-wide playback resource.
//!
//! [`AudioSink`] is the object-safe seam between the playback controller and
//! the actual audio hardware; tests substitute a mock.  [`RodioSink`] is the
//! production implementation: a dedicated playback thread owns the rodio
//! `OutputStream` (which is not `Send`), opens it lazily on the first play
//! request, and reuses it for the lifetime of the process.  It is never
//! explicitly torn down — the OS reclaims it on exit.

use std::sync::{mpsc, Mutex};

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

use super::decoder::DecodedAudio;

// ---------------------------------------------------------------------------
// OutputError
// ---------------------------------------------------------------------------

/// Errors surfaced by the audio output layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OutputError {
    /// The host has no usable audio output device.
    #[error("audio output is unavailable: {0}")]
    Unavailable(String),

    /// Playback started but failed partway through.
    #[error("audio playback failed: {0}")]
    Playback(String),
}

// ---------------------------------------------------------------------------
// AudioSink trait
// ---------------------------------------------------------------------------

/// Blocking audio output.
///
/// `play` must not return until the audio has finished playing naturally.
/// Callers run it on the blocking thread pool (`tokio::task::spawn_blocking`)
/// so the async runtime never stalls.  Implementors must be `Send + Sync`
/// (shared as `Arc<dyn AudioSink>`).
pub trait AudioSink: Send + Sync {
    fn play(&self, audio: &DecodedAudio) -> Result<(), OutputError>;
}

// ---------------------------------------------------------------------------
// RodioSink
// ---------------------------------------------------------------------------

/// One queued playback job for the playback thread.
struct PlayJob {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
    volume: f32,
    done: mpsc::Sender<Result<(), OutputError>>,
}

/// rodio-backed [`AudioSink`].
///
/// The playback thread is spawned lazily on the first [`play`](AudioSink::play)
/// call and kept alive afterwards; the `OutputStream` it owns is likewise
/// opened once and reused, so repeated speak requests do not reopen the
/// audio device.
pub struct RodioSink {
    volume: f32,
    worker_tx: Mutex<Option<mpsc::Sender<PlayJob>>>,
}

impl RodioSink {
    pub fn new(volume: f32) -> Self {
        Self {
            volume,
            worker_tx: Mutex::new(None),
        }
    }

    /// Get the playback-thread sender, spawning the thread on first use.
    fn worker(&self) -> Result<mpsc::Sender<PlayJob>, OutputError> {
        let mut guard = self.worker_tx.lock().unwrap();
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<PlayJob>();
        std::thread::Builder::new()
            .name("audio-playback".into())
            .spawn(move || playback_loop(rx))
            .map_err(|e| OutputError::Unavailable(format!("failed to spawn playback thread: {e}")))?;

        log::info!("audio: playback thread started");
        *guard = Some(tx.clone());
        Ok(tx)
    }
}

impl AudioSink for RodioSink {
    fn play(&self, audio: &DecodedAudio) -> Result<(), OutputError> {
        let tx = self.worker()?;

        let (done_tx, done_rx) = mpsc::channel();
        let job = PlayJob {
            samples: audio.interleaved(),
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            volume: self.volume,
            done: done_tx,
        };

        tx.send(job)
            .map_err(|_| OutputError::Playback("playback thread is gone".into()))?;

        done_rx
            .recv()
            .map_err(|_| OutputError::Playback("playback thread dropped the job".into()))?
    }
}

/// Playback thread body: open the output stream on the first job, then play
/// each job to completion and report the result back.
fn playback_loop(rx: mpsc::Receiver<PlayJob>) {
    let mut stream: Option<(OutputStream, OutputStreamHandle)> = None;

    while let Ok(job) = rx.recv() {
        let result = play_one(&mut stream, &job);
        if let Err(ref e) = result {
            log::error!("audio: {e}");
        }
        // Receiver may have given up waiting; nothing to do about it.
        let _ = job.done.send(result);
    }

    log::debug!("audio: playback thread shutting down");
}

fn play_one(
    stream: &mut Option<(OutputStream, OutputStreamHandle)>,
    job: &PlayJob,
) -> Result<(), OutputError> {
    if stream.is_none() {
        let opened =
            OutputStream::try_default().map_err(|e| OutputError::Unavailable(e.to_string()))?;
        *stream = Some(opened);
    }
    // Just opened above if it was absent.
    let (_stream, handle) = stream.as_ref().unwrap();

    let sink = Sink::try_new(handle).map_err(|e| OutputError::Playback(e.to_string()))?;
    sink.set_volume(job.volume);
    sink.append(SamplesBuffer::new(
        job.channels,
        job.sample_rate,
        job.samples.clone(),
    ));
    sink.sleep_until_end();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
