// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Push operator accumulating state across yields.
//!
//! For every yielded value the reducer is called with the current accumulator
//! and the value; its result becomes the new accumulator and is forwarded
//! downstream.
//!
//! The accumulator starts unset. The first yielded value is reduced twice:
//! once with `None`, which is how the reducer produces its seed, and once
//! with `Some(seed)`, whose result is the first value forwarded. With
//! `|s, v| Ok(s.map_or(10, |s| s + v))` over `[1, 2]` the consumer receives
//! `[11, 13]`.
//!
//! # Behavior
//!
//! - **Upstream failures** are forwarded unchanged and leave the accumulator as it was
//! - **Reducer failures** are forwarded as the failure of that step; the accumulator
//!   keeps its previous value, so a failed seed is computed again on the next yield
//! - **Complete** is forwarded and releases the accumulator
//!
//! # Examples
//!
//! ```rust
//! use tidal_core::{PushProducerExt, Result};
//! use tidal_stream::ScanExt;
//! use tidal_test_utils::{completed_with, numbers, push_consumer, push_producer, ConsumerOptions, ProducerOptions, Recorder};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let recorder = Recorder::new();
//!
//! push_producer(ProducerOptions::new(), numbers(4))
//!     .scan(|sum: Option<i32>, value: i32| Ok(sum.map_or(0, |sum| sum + value)))
//!     .run(push_consumer(ConsumerOptions::new(), &recorder))
//!     .await?;
//!
//! assert_eq!(recorder.calls(), completed_with([0, 1, 3, 6]));
//! # Ok(())
//! # }
//! ```

use core::future::Future;
use futures::future::{self, BoxFuture, FutureExt, Ready};
use tidal_core::step::{self, PendingStep};
use tidal_core::{
    BoxPushConsumer, Flow, PushConsumer, PushOperator, PushProducer, PushProducerExt, Result,
    Step, Through,
};

/// A reducer driving [`PushScan`].
///
/// Implemented by [`SyncReducer`] and [`AsyncReducer`]; build them through
/// [`push_scan`] and [`push_scan_async`].
pub trait Reducer<S, T>: Send {
    type Future: Future<Output = Result<S>> + Send;

    fn reduce(&mut self, state: Option<S>, value: T) -> Self::Future;
}

/// Reducer returning its result directly.
pub struct SyncReducer<F>(F);

impl<S, T, F> Reducer<S, T> for SyncReducer<F>
where
    S: Send,
    F: FnMut(Option<S>, T) -> Result<S> + Send,
{
    type Future = Ready<Result<S>>;

    fn reduce(&mut self, state: Option<S>, value: T) -> Self::Future {
        future::ready((self.0)(state, value))
    }
}

/// Reducer returning a future of its result.
pub struct AsyncReducer<F>(F);

impl<S, T, F, Fut> Reducer<S, T> for AsyncReducer<F>
where
    F: FnMut(Option<S>, T) -> Fut + Send,
    Fut: Future<Output = Result<S>> + Send,
{
    type Future = Fut;

    fn reduce(&mut self, state: Option<S>, value: T) -> Self::Future {
        (self.0)(state, value)
    }
}

/// Push operator returned by [`push_scan`] and [`push_scan_async`].
pub struct PushScan<R> {
    reducer: R,
}

/// Creates a scan operator from a synchronous reducer.
///
/// Return `Err(StreamError::transform(..))` from the reducer to fail a step.
pub fn push_scan<T, S, F>(reducer: F) -> PushScan<SyncReducer<F>>
where
    F: FnMut(Option<S>, T) -> Result<S> + Send,
{
    PushScan {
        reducer: SyncReducer(reducer),
    }
}

/// Creates a scan operator from a reducer returning a future.
pub fn push_scan_async<T, S, F, Fut>(reducer: F) -> PushScan<AsyncReducer<F>>
where
    F: FnMut(Option<S>, T) -> Fut + Send,
    Fut: Future<Output = Result<S>> + Send,
{
    PushScan {
        reducer: AsyncReducer(reducer),
    }
}

impl<T, S, R> PushOperator<T, S> for PushScan<R>
where
    T: Clone + Send + 'static,
    S: Clone + Send + 'static,
    R: Reducer<S, T> + 'static,
{
    fn bind(self, downstream: BoxPushConsumer<S>) -> BoxPushConsumer<T> {
        Box::new(ScanConsumer {
            reducer: self.reducer,
            state: None,
            downstream,
        })
    }
}

struct ScanConsumer<S, R> {
    reducer: R,
    state: Option<S>,
    downstream: BoxPushConsumer<S>,
}

impl<T, S, R> PushConsumer<T> for ScanConsumer<S, R>
where
    T: Clone + Send + 'static,
    S: Clone + Send + 'static,
    R: Reducer<S, T>,
{
    fn push(&mut self, step: PendingStep<T>) -> BoxFuture<'_, Result<Flow>> {
        async move {
            let reduced = match step.await {
                Ok(Step::Yield(value)) => {
                    let state = match self.state.clone() {
                        Some(state) => Ok(state),
                        None => self.reducer.reduce(None, value.clone()).await,
                    };
                    match state {
                        Ok(state) => self.reducer.reduce(Some(state), value).await,
                        Err(error) => Err(error),
                    }
                }
                Ok(Step::Complete) => {
                    self.state = None;
                    return self.downstream.push(step::completed()).await;
                }
                Err(error) => return self.downstream.push(step::failed(error)).await,
            };

            match reduced {
                Ok(state) => {
                    self.state = Some(state.clone());
                    self.downstream.push(step::yielded(state)).await
                }
                Err(error) => self.downstream.push(step::failed(error)).await,
            }
        }
        .boxed()
    }
}

/// Extension trait providing the `scan` operators on push producers.
pub trait ScanExt<T>: PushProducer<T> + Sized {
    /// Accumulates state across yields with a synchronous reducer.
    ///
    /// See the [module-level documentation](crate::scan) for details.
    fn scan<S, F>(self, reducer: F) -> Through<Self, PushScan<SyncReducer<F>>, T>
    where
        T: Clone + Send + 'static,
        S: Clone + Send + 'static,
        F: FnMut(Option<S>, T) -> Result<S> + Send + 'static,
    {
        self.through::<S, _>(push_scan(reducer))
    }

    /// Accumulates state across yields with an asynchronous reducer.
    fn scan_async<S, F, Fut>(self, reducer: F) -> Through<Self, PushScan<AsyncReducer<F>>, T>
    where
        T: Clone + Send + 'static,
        S: Clone + Send + 'static,
        F: FnMut(Option<S>, T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<S>> + Send,
    {
        self.through::<S, _>(push_scan_async(reducer))
    }
}

impl<T, P: PushProducer<T>> ScanExt<T> for P {}
