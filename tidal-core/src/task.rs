// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background work owned by an operator instance.
//!
//! Operators that keep sources busy between pulls (merge, with-latest) run
//! that work as spawned tasks. Each task is tied to a [`StreamTask`] handle;
//! dropping the handle signals the task's [`CancellationToken`], so an
//! operator that is dropped or completes leaves nothing running behind it.

use core::future::Future;
use tokio_util::sync::CancellationToken;

/// Spawned task handle with cooperative cancellation on drop.
///
/// # Example
///
/// ```rust
/// use tidal_core::StreamTask;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let task = StreamTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// assert!(!task.is_cancelled());
/// drop(task); // the spawned future observes the cancellation and returns
/// # }
/// ```
#[derive(Debug)]
pub struct StreamTask {
    cancel: CancellationToken,
}

impl StreamTask {
    /// Spawns `f(token)` on the current tokio runtime.
    ///
    /// The future should watch the token and return once it is cancelled.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Signals the task to stop at its next cancellation checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for StreamTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
