//! Trailing-edge debouncer for rapidly-changing input values.
//!
//! The UI pushes the full source text into the debouncer on every keystroke;
//! the debouncer forwards a value only once it has remained the latest value
//! for the full quiet period.  Intermediate values are dropped, never queued,
//! so fast typing produces exactly one translation request for the final
//! text.
//!
//! ```text
//! keystrokes ──▶ raw_tx ──▶ run_debouncer(quiet) ──▶ debounced_rx ──▶ orchestrator
//! ```

use std::time::Duration;

use tokio::sync::mpsc;

/// Run the debouncer until the input channel closes.
///
/// Forwards the most recent value received on `rx` to `tx` only after
/// `quiet_period` elapses with no newer value arriving.  Every new value
/// cancels the pending timer (classic trailing-edge debounce).  A value
/// equal to the last forwarded one is suppressed, so re-sending unchanged
/// text never re-triggers downstream work.
///
/// When `rx` closes, any pending value is flushed before the task returns.
/// Spawn this as a tokio task from `main()`.
pub async fn run_debouncer<T>(mut rx: mpsc::Receiver<T>, quiet_period: Duration, tx: mpsc::Sender<T>)
where
    T: PartialEq + Clone + Send + 'static,
{
    let mut last_sent: Option<T> = None;
    let mut pending: Option<T> = None;

    loop {
        match pending.take() {
            // Nothing buffered — block until the next value or channel close.
            None => match rx.recv().await {
                Some(value) => pending = Some(value),
                None => break,
            },

            // A value is waiting out its quiet period.
            Some(value) => {
                tokio::select! {
                    next = rx.recv() => match next {
                        // Newer value arrived — restart the quiet period.
                        Some(newer) => pending = Some(newer),
                        // Input closed — flush the pending value and stop.
                        None => {
                            forward(&tx, &mut last_sent, value).await;
                            break;
                        }
                    },
                    _ = tokio::time::sleep(quiet_period) => {
                        if !forward(&tx, &mut last_sent, value).await {
                            // Downstream is gone; no point debouncing further.
                            break;
                        }
                    }
                }
            }
        }
    }

    log::debug!("debouncer: input channel closed, task exiting");
}

/// Send `value` unless it equals the last forwarded value.
///
/// Returns `false` when the output channel is closed.
async fn forward<T>(tx: &mpsc::Sender<T>, last_sent: &mut Option<T>, value: T) -> bool
where
    T: PartialEq + Clone,
{
    if last_sent.as_ref() == Some(&value) {
        return true;
    }
    *last_sent = Some(value.clone());
    tx.send(value).await.is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    fn spawn_debouncer(
        quiet: Duration,
    ) -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
        let (raw_tx, raw_rx) = mpsc::channel(16);
        let (debounced_tx, debounced_rx) = mpsc::channel(16);
        tokio::spawn(run_debouncer(raw_rx, quiet, debounced_tx));
        (raw_tx, debounced_rx)
    }

    /// A single value is forwarded after the quiet period elapses.
    #[tokio::test(start_paused = true)]
    async fn single_value_is_forwarded() {
        let (tx, mut rx) = spawn_debouncer(QUIET);

        tx.send("hello".to_string()).await.unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    /// Fast successive edits: only the final value survives — simulates
    /// typing "a" then "ab" before the quiet period fires.
    #[tokio::test(start_paused = true)]
    async fn rapid_edits_emit_only_last_value() {
        let (tx, mut rx) = spawn_debouncer(QUIET);

        tx.send("a".to_string()).await.unwrap();
        tx.send("ab".to_string()).await.unwrap();
        drop(tx); // close input so the task flushes and exits

        assert_eq!(rx.recv().await.as_deref(), Some("ab"));
        // "a" must never have been emitted.
        assert!(rx.recv().await.is_none());
    }

    /// A new value arriving mid-quiet-period restarts the timer; both values
    /// are eventually emitted when separated by a full quiet period.
    #[tokio::test(start_paused = true)]
    async fn separated_values_are_both_emitted() {
        let (tx, mut rx) = spawn_debouncer(QUIET);

        tx.send("first".to_string()).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("first"));

        tx.send("second".to_string()).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("second"));
    }

    /// Re-sending an unchanged value does not re-emit it.
    #[tokio::test(start_paused = true)]
    async fn unchanged_value_is_suppressed() {
        let (tx, mut rx) = spawn_debouncer(QUIET);

        tx.send("same".to_string()).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("same"));

        tx.send("same".to_string()).await.unwrap();
        drop(tx);

        // The duplicate is swallowed; channel just closes.
        assert!(rx.recv().await.is_none());
    }

    /// Closing the input flushes a pending value instead of dropping it.
    #[tokio::test(start_paused = true)]
    async fn close_flushes_pending_value() {
        let (tx, mut rx) = spawn_debouncer(QUIET);

        tx.send("pending".to_string()).await.unwrap();
        drop(tx);

        assert_eq!(rx.recv().await.as_deref(), Some("pending"));
        assert!(rx.recv().await.is_none());
    }
}
