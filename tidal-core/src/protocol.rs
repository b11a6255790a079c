// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The two dual stream protocols.
//!
//! - **Pull**: the consumer drives. Whoever holds a [`PullProducer`] calls
//!   [`pull`](PullProducer::pull) to obtain the next step, one step at a time.
//! - **Push**: the producer drives. A [`PushProducer`] is handed a
//!   [`PushConsumer`] and calls [`push`](PushConsumer::push) once per step,
//!   awaiting the consumer's [`Flow`] before computing the next step.
//!
//! A [`PushOperator`] sits between a push producer and its sink by mapping
//! the downstream consumer to a new upstream consumer.
//!
//! # Example
//!
//! ```
//! use tidal_core::{pull_fn, PullProducer, Step};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tidal_core::Result<()> {
//! let mut remaining = 2;
//! let mut countdown = pull_fn(move || {
//!     let step = if remaining > 0 {
//!         remaining -= 1;
//!         Step::Yield(remaining)
//!     } else {
//!         Step::Complete
//!     };
//!     async move { Ok(step) }
//! });
//!
//! assert_eq!(countdown.pull().await?, Step::Yield(1));
//! assert_eq!(countdown.pull().await?, Step::Yield(0));
//! assert_eq!(countdown.pull().await?, Step::Complete);
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::step::{PendingStep, StepResult};
use core::future::Future;
use core::marker::PhantomData;
use futures::future::{BoxFuture, FutureExt};

/// Continuation signal returned by a push consumer for every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Keep pushing
    Continue,
    /// Stop: the producer must not start computing another step
    Cancel,
}

impl Flow {
    pub const fn is_cancel(self) -> bool {
        matches!(self, Flow::Cancel)
    }
}

/// Consumer-driven source of steps.
///
/// Each call returns one step. Callers must not pull again after observing
/// `Complete`; producers built by this workspace answer such a pull with
/// `Complete` again rather than re-entering their source.
pub trait PullProducer<T>: Send {
    fn pull(&mut self) -> BoxFuture<'_, StepResult<T>>;
}

/// Sink invoked once per step by a push producer.
///
/// Receives the step still pending. `Ok(Flow::Cancel)` asks the producer to
/// stop; `Err` is a crash (or an unrecovered failure) and stops it too.
pub trait PushConsumer<T>: Send {
    fn push(&mut self, step: PendingStep<T>) -> BoxFuture<'_, Result<Flow>>;
}

/// Producer-driven source of steps.
///
/// Driving takes ownership of the consumer; the returned future resolves once
/// the producer delivered `Complete`, was cancelled, or was stopped by a
/// failure the consumer did not recover from (in which case it is `Err`).
pub trait PushProducer<T>: Send {
    fn drive(self: Box<Self>, consumer: BoxPushConsumer<T>) -> BoxFuture<'static, Result<()>>;
}

/// Maps a downstream push consumer to the consumer installed upstream of it.
pub trait PushOperator<In, Out>: Send {
    fn bind(self, downstream: BoxPushConsumer<Out>) -> BoxPushConsumer<In>;
}

pub type BoxPullProducer<T> = Box<dyn PullProducer<T>>;
pub type BoxPushConsumer<T> = Box<dyn PushConsumer<T>>;
pub type BoxPushProducer<T> = Box<dyn PushProducer<T>>;

impl<T, P> PullProducer<T> for Box<P>
where
    P: PullProducer<T> + ?Sized,
{
    fn pull(&mut self) -> BoxFuture<'_, StepResult<T>> {
        (**self).pull()
    }
}

impl<T, P> PushProducer<T> for Box<P>
where
    P: PushProducer<T> + ?Sized,
{
    fn drive(self: Box<Self>, consumer: BoxPushConsumer<T>) -> BoxFuture<'static, Result<()>> {
        <P as PushProducer<T>>::drive(*self, consumer)
    }
}

impl<T, C> PushConsumer<T> for Box<C>
where
    C: PushConsumer<T> + ?Sized,
{
    fn push(&mut self, step: PendingStep<T>) -> BoxFuture<'_, Result<Flow>> {
        (**self).push(step)
    }
}

/// Pull producer backed by a closure; see [`pull_fn`].
pub struct PullFn<F> {
    f: F,
}

/// Creates a pull producer from a closure returning the next step's future.
pub fn pull_fn<T, F, Fut>(f: F) -> PullFn<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = StepResult<T>> + Send + 'static,
{
    PullFn { f }
}

impl<T, F, Fut> PullProducer<T> for PullFn<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = StepResult<T>> + Send + 'static,
{
    fn pull(&mut self) -> BoxFuture<'_, StepResult<T>> {
        (self.f)().boxed()
    }
}

/// Push producer backed by a closure; see [`push_fn`].
pub struct PushFn<T, F> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

/// Creates a push producer from a closure that drives the given consumer.
pub fn push_fn<T, F, Fut>(f: F) -> PushFn<T, F>
where
    F: FnOnce(BoxPushConsumer<T>) -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    PushFn {
        f,
        _marker: PhantomData,
    }
}

impl<T, F, Fut> PushProducer<T> for PushFn<T, F>
where
    F: FnOnce(BoxPushConsumer<T>) -> Fut + Send,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn drive(self: Box<Self>, consumer: BoxPushConsumer<T>) -> BoxFuture<'static, Result<()>> {
        (self.f)(consumer).boxed()
    }
}
