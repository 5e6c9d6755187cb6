//! Transient "thinking" indicator shown while a reply is in flight
//!
//! The ticker cycles through a fixed phrase list on a fixed interval. It is
//! purely cosmetic and never gates correctness; the only hard requirement is
//! that the underlying task stops on every pipeline exit path so no orphaned
//! timer keeps mutating state for a request that already resolved.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Phrases cycled while waiting for the assistant
pub const THINKING_PHRASES: &[&str] = &[
    "Analyzing context...",
    "Consulting the knowledge graph...",
    "Weighing strategies...",
    "Cross-checking recent stats...",
    "Drafting a reply...",
];

/// Interval between phrase changes
pub const THINKING_TICK: Duration = Duration::from_millis(1800);

/// Cycling placeholder text driven by a background task
///
/// Dropping the ticker cancels the task; `stop` does the same explicitly.
pub struct ThinkingTicker {
    rx: watch::Receiver<&'static str>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ThinkingTicker {
    /// Starts a ticker cycling at the given interval
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use corechat::session::ticker::{ThinkingTicker, THINKING_TICK};
    ///
    /// # async fn example() {
    /// let ticker = ThinkingTicker::start(THINKING_TICK);
    /// println!("{}", ticker.current());
    /// # }
    /// ```
    pub fn start(interval: Duration) -> Self {
        let (tx, rx) = watch::channel(THINKING_PHRASES[0]);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick of a tokio interval fires immediately; consume
            // it so the initial phrase stays visible for one full interval.
            ticker.tick().await;
            let mut index = 0usize;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        index = (index + 1) % THINKING_PHRASES.len();
                        if tx.send(THINKING_PHRASES[index]).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, cancel, handle }
    }

    /// The phrase to display right now
    pub fn current(&self) -> &'static str {
        *self.rx.borrow()
    }

    /// A receiver that observes phrase changes
    pub fn subscribe(&self) -> watch::Receiver<&'static str> {
        self.rx.clone()
    }

    /// Stops the ticker task
    pub fn stop(self) {
        // Drop handles the cancellation.
    }
}

impl Drop for ThinkingTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}
