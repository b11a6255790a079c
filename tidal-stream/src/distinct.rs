// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Adjacency filters for both protocols.
//!
//! Both variants compare each yielded value with the last one seen through a
//! predicate `is_allowed(previous, next)`. `previous` is `None` until a value
//! has been seen, so the predicate decides what happens to the first value.
//!
//! # Behavior
//!
//! - **Push**: an allowed value becomes the new `previous` and is forwarded; a
//!   disallowed one is dropped and nothing is forwarded in its place.
//!   `Complete` resets `previous` and is forwarded.
//! - **Pull**: every pull keeps pulling upstream until a value is allowed or the
//!   source completes. `previous` tracks every observed value, allowed or not.
//! - A failing predicate fails the step; upstream failures pass through unchanged.
//!
//! # Examples
//!
//! ```rust
//! use tidal_core::{pull_fn, PullProducer, Step};
//! use tidal_stream::PullDistinctExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tidal_core::Result<()> {
//! let mut readings = vec![1, 1, 2, 2, 1].into_iter();
//! let source = pull_fn(move || {
//!     let step = Step::from(readings.next());
//!     async move { Ok(step) }
//! });
//!
//! let mut changes = source.distinct_until_changed();
//!
//! assert_eq!(changes.pull().await?, Step::Yield(1));
//! assert_eq!(changes.pull().await?, Step::Yield(2));
//! assert_eq!(changes.pull().await?, Step::Yield(1));
//! assert_eq!(changes.pull().await?, Step::Complete);
//! # Ok(())
//! # }
//! ```

use futures::future::{BoxFuture, FutureExt};
use tidal_core::step::{self, PendingStep, StepResult};
use tidal_core::{
    BoxPushConsumer, Flow, PullProducer, PushConsumer, PushOperator, PushProducer,
    PushProducerExt, Result, Step, Through,
};

/// Predicate used by the `distinct_until_changed` variants.
pub type Changed<T> = fn(Option<&T>, &T) -> Result<bool>;

fn changed<T: PartialEq>(previous: Option<&T>, next: &T) -> Result<bool> {
    Ok(previous != Some(next))
}

/// Push operator returned by [`push_distinct`].
pub struct PushDistinct<F> {
    is_allowed: F,
}

/// Creates a push adjacency filter.
pub fn push_distinct<T, F>(is_allowed: F) -> PushDistinct<F>
where
    F: FnMut(Option<&T>, &T) -> Result<bool> + Send,
{
    PushDistinct { is_allowed }
}

impl<T, F> PushOperator<T, T> for PushDistinct<F>
where
    T: Clone + Send + 'static,
    F: FnMut(Option<&T>, &T) -> Result<bool> + Send + 'static,
{
    fn bind(self, downstream: BoxPushConsumer<T>) -> BoxPushConsumer<T> {
        Box::new(DistinctConsumer {
            is_allowed: self.is_allowed,
            last: None,
            downstream,
        })
    }
}

struct DistinctConsumer<T, F> {
    is_allowed: F,
    last: Option<T>,
    downstream: BoxPushConsumer<T>,
}

impl<T, F> PushConsumer<T> for DistinctConsumer<T, F>
where
    T: Clone + Send + 'static,
    F: FnMut(Option<&T>, &T) -> Result<bool> + Send,
{
    fn push(&mut self, step: PendingStep<T>) -> BoxFuture<'_, Result<Flow>> {
        async move {
            let value = match step.await {
                Ok(Step::Yield(value)) => value,
                Ok(Step::Complete) => {
                    self.last = None;
                    return self.downstream.push(step::completed()).await;
                }
                Err(error) => return self.downstream.push(step::failed(error)).await,
            };

            match (self.is_allowed)(self.last.as_ref(), &value) {
                Ok(true) => {
                    self.last = Some(value.clone());
                    self.downstream.push(step::yielded(value)).await
                }
                Ok(false) => Ok(Flow::Continue),
                Err(error) => self.downstream.push(step::failed(error)).await,
            }
        }
        .boxed()
    }
}

/// Pull producer returned by [`pull_distinct`].
pub struct PullDistinct<P, T, F> {
    source: P,
    is_allowed: F,
    last: Option<T>,
    done: bool,
}

/// Creates a pull adjacency filter over `source`.
pub fn pull_distinct<T, P, F>(source: P, is_allowed: F) -> PullDistinct<P, T, F>
where
    P: PullProducer<T>,
    F: FnMut(Option<&T>, &T) -> Result<bool> + Send,
{
    PullDistinct {
        source,
        is_allowed,
        last: None,
        done: false,
    }
}

impl<T, P, F> PullProducer<T> for PullDistinct<P, T, F>
where
    T: Clone + Send,
    P: PullProducer<T>,
    F: FnMut(Option<&T>, &T) -> Result<bool> + Send,
{
    fn pull(&mut self) -> BoxFuture<'_, StepResult<T>> {
        async move {
            while !self.done {
                let value = match self.source.pull().await? {
                    Step::Yield(value) => value,
                    Step::Complete => {
                        self.last = None;
                        self.done = true;
                        break;
                    }
                };

                let allowed = (self.is_allowed)(self.last.as_ref(), &value);
                self.last = Some(value.clone());
                if allowed? {
                    return Ok(Step::Yield(value));
                }
            }
            Ok(Step::Complete)
        }
        .boxed()
    }
}

/// Extension trait providing adjacency filters on push producers.
pub trait DistinctExt<T>: PushProducer<T> + Sized {
    /// Drops every yield `is_allowed` rejects against the last forwarded value.
    fn distinct_by<F>(self, is_allowed: F) -> Through<Self, PushDistinct<F>, T>
    where
        T: Clone + Send + 'static,
        F: FnMut(Option<&T>, &T) -> Result<bool> + Send + 'static,
    {
        self.through::<T, _>(push_distinct(is_allowed))
    }

    /// Drops yields equal to the last forwarded value.
    fn distinct_until_changed(self) -> Through<Self, PushDistinct<Changed<T>>, T>
    where
        T: Clone + PartialEq + Send + 'static,
    {
        self.through::<T, _>(push_distinct(changed::<T> as Changed<T>))
    }
}

impl<T, P: PushProducer<T>> DistinctExt<T> for P {}

/// Extension trait providing adjacency filters on pull producers.
pub trait PullDistinctExt<T>: PullProducer<T> + Sized {
    /// Skips every yield `is_allowed` rejects against the last observed value.
    fn distinct_by<F>(self, is_allowed: F) -> PullDistinct<Self, T, F>
    where
        F: FnMut(Option<&T>, &T) -> Result<bool> + Send,
    {
        pull_distinct(self, is_allowed)
    }

    /// Skips yields equal to the last observed value.
    fn distinct_until_changed(self) -> PullDistinct<Self, T, Changed<T>>
    where
        T: PartialEq,
    {
        pull_distinct(self, changed::<T> as Changed<T>)
    }
}

impl<T, P: PullProducer<T>> PullDistinctExt<T> for P {}
