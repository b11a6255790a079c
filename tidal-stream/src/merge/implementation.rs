// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::panic::AssertUnwindSafe;
use std::pin::pin;

use futures::channel::mpsc;
use futures::future::{self, BoxFuture, FutureExt};
use futures::{SinkExt, StreamExt};
use tidal_core::{
    BoxPullProducer, CancellationToken, PullProducer, Step, StepResult, StreamError, StreamTask,
};

pub(super) struct PullMerge<T> {
    results: mpsc::Receiver<StepResult<T>>,
    _requests: Vec<StreamTask>,
    done: bool,
}

impl<T: Send + 'static> PullMerge<T> {
    pub(super) fn new(sources: Vec<BoxPullProducer<T>>) -> Self {
        // Zero buffer: every source gets exactly one slot in the channel
        let (sender, results) = mpsc::channel(0);

        let requests = sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                let sender = sender.clone();
                StreamTask::spawn(move |cancel| request_loop(index, source, sender, cancel))
            })
            .collect();

        Self {
            results,
            _requests: requests,
            done: false,
        }
    }
}

impl<T: Send + 'static> PullProducer<T> for PullMerge<T> {
    fn pull(&mut self) -> BoxFuture<'_, StepResult<T>> {
        async move {
            while !self.done {
                match self.results.next().await {
                    Some(Ok(Step::Complete)) => continue,
                    Some(result) => return result,
                    None => self.done = true,
                }
            }
            Ok(Step::Complete)
        }
        .boxed()
    }
}

/// Keeps one request in flight on `source` until it completes, fails, or the
/// merge goes away.
///
/// A settled result is fed into the sender's own channel slot without waiting
/// for the merged producer to take it, so the next request starts right away.
async fn request_loop<T: Send + 'static>(
    index: usize,
    mut source: BoxPullProducer<T>,
    mut sender: mpsc::Sender<StepResult<T>>,
    cancel: CancellationToken,
) {
    let requests = async {
        while !cancel.is_cancelled() {
            let result = AssertUnwindSafe(async { source.pull().await })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    warn!("merge: source {index} panicked while pulled");
                    Err(StreamError::upstream(format!("merge source {index} crashed")))
                });

            let retired = !matches!(result, Ok(Step::Yield(_)));
            if sender.feed(result).await.is_err() {
                trace!("merge: receiver dropped, source {index} stops");
                return;
            }
            if retired {
                debug!("merge: source {index} retired");
                return;
            }
        }
        trace!("merge: source {index} cancelled");
    };

    // Cancellation is polled first so a woken task never starts another request
    future::select(pin!(cancel.cancelled()), pin!(requests)).await;
}
