//! Cancellable delay timer for keystroke-driven work.
//!
//! Each `schedule` call disarms the previous pending timer and arms a new one
//! stamped with a fresh generation. Once a timer fires its task runs to
//! completion; callers compare the delivered generation with
//! [`Debouncer::is_current`] to drop results that were overtaken.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm a timer that runs `f(generation)` after the quiet period.
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F, Fut>(&self, f: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();

        if let Some(previous) = self.pending.lock().replace(token.clone()) {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!("Debounce timer {} disarmed", generation);
                }
                _ = tokio::time::sleep(delay) => {
                    tracing::trace!("Debounce timer {} fired", generation);
                    f(generation).await;
                }
            }
        });

        generation
    }

    /// Disarm the pending timer and invalidate anything already in flight.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.pending.lock().take() {
            previous.cancel();
        }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().take() {
            pending.cancel();
        }
    }
}
