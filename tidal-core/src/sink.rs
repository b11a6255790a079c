// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Terminal consumers for both protocols.
//!
//! Whether a failure ends the stream is decided here, at the consuming end,
//! through an [`ErrorPolicy`]. Operators in between never swallow or retry
//! failures; they forward them.
//!
//! - [`sink`] builds a push consumer.
//! - [`drain`] pulls a pull producer to its end.
//!
//! Both hand every observation to an async handler as a [`Notification`] and
//! let the handler's [`Flow`] decide whether to go on.

use crate::error::{Result, StreamError};
use crate::protocol::{Flow, PullProducer, PushConsumer};
use crate::step::{PendingStep, Step};
use core::future::Future;
use core::marker::PhantomData;
use futures::future::{BoxFuture, FutureExt};

/// Consumer-side handling of a failed step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// The first failure terminates the stream and surfaces as `Err`
    #[default]
    FailFast,
    /// Failures are delivered as [`Notification::Failure`] and consumption goes on
    Continue,
}

/// What a terminal handler observes.
#[derive(Debug, Clone)]
pub enum Notification<T> {
    Yield(T),
    Complete,
    /// Only delivered under [`ErrorPolicy::Continue`]
    Failure(StreamError),
}

impl<T: PartialEq> PartialEq for Notification<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Notification::Yield(a), Notification::Yield(b)) => a == b,
            (Notification::Complete, Notification::Complete) => true,
            _ => false, // Failures are never equal
        }
    }
}

/// Push consumer returned by [`sink`].
pub struct Sink<T, F> {
    handler: F,
    policy: ErrorPolicy,
    finished: bool,
    _marker: PhantomData<fn(T)>,
}

/// Creates a terminal push consumer.
///
/// Yields are passed to `handler` and its `Flow` is returned to the producer.
/// `Complete` is passed on and ends consumption. A failure either becomes the
/// `Err` of this push (fail-fast) or a `Notification::Failure` (continue).
pub fn sink<T, F, Fut>(policy: ErrorPolicy, handler: F) -> Sink<T, F>
where
    F: FnMut(Notification<T>) -> Fut + Send,
    Fut: Future<Output = Result<Flow>> + Send,
{
    Sink {
        handler,
        policy,
        finished: false,
        _marker: PhantomData,
    }
}

impl<T, F, Fut> PushConsumer<T> for Sink<T, F>
where
    T: Send + 'static,
    F: FnMut(Notification<T>) -> Fut + Send,
    Fut: Future<Output = Result<Flow>> + Send,
{
    fn push(&mut self, step: PendingStep<T>) -> BoxFuture<'_, Result<Flow>> {
        async move {
            if self.finished {
                return Ok(Flow::Cancel);
            }
            match step.await {
                Ok(Step::Yield(value)) => (self.handler)(Notification::Yield(value)).await,
                Ok(Step::Complete) => {
                    self.finished = true;
                    (self.handler)(Notification::Complete).await?;
                    Ok(Flow::Cancel)
                }
                Err(error) => match self.policy {
                    ErrorPolicy::FailFast => {
                        self.finished = true;
                        Err(error)
                    }
                    ErrorPolicy::Continue => (self.handler)(Notification::Failure(error)).await,
                },
            }
        }
        .boxed()
    }
}

/// Pulls `producer` until it completes, the handler cancels, or a failure
/// goes unrecovered.
pub async fn drain<T, P, F, Fut>(mut producer: P, policy: ErrorPolicy, mut handler: F) -> Result<()>
where
    P: PullProducer<T>,
    F: FnMut(Notification<T>) -> Fut,
    Fut: Future<Output = Result<Flow>>,
{
    loop {
        let notification = match producer.pull().await {
            Ok(Step::Yield(value)) => Notification::Yield(value),
            Ok(Step::Complete) => {
                handler(Notification::Complete).await?;
                return Ok(());
            }
            Err(error) => match policy {
                ErrorPolicy::FailFast => return Err(error),
                ErrorPolicy::Continue => Notification::Failure(error),
            },
        };

        if handler(notification).await? == Flow::Cancel {
            return Ok(());
        }
    }
}
