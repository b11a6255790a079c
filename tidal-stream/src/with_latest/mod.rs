// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Pairs a pull producer with the latest values of push producers.
//!
//! Each pull pulls the main producer exactly once and pairs its value with a
//! snapshot of the latest value every auxiliary push producer delivered so far:
//! `(main, vec![latest_0, latest_1, ..])`, where a slot stays `None` until its
//! producer yields.
//!
//! # Behavior
//!
//! - **Eager auxiliaries**: every auxiliary producer is driven from the moment the
//!   operator is created, independent of pulls; a slow auxiliary leaves a stale
//!   or empty slot rather than delaying a pull. The first pull yields to the
//!   runtime once, so auxiliaries with values at hand fill their slots before
//!   the first snapshot
//! - **Main cadence**: the main producer alone decides when tuples are emitted
//! - **No auxiliaries**: every main value is paired with an empty vector
//! - **Completion**: when the main producer completes, the operator completes and
//!   every auxiliary producer is cancelled
//!
//! # Error Handling
//!
//! An auxiliary failure does not stop the operator. It is held for its slot and
//! surfaces as the `Err` of the next pull: before the main producer is pulled
//! if it is already known, or in place of the tuple if it arrived while the
//! main value was being computed. In the latter case the main value is kept and
//! emitted by the following pull. The slot keeps its last good value.
//!
//! Auxiliaries run as tasks on the ambient tokio runtime, so the operator must
//! be created inside one when it has any.
//!
//! # Example
//!
//! ```rust
//! use tidal_core::{PullProducer, Step};
//! use tidal_stream::WithLatestExt;
//! use tidal_test_utils::{pull_producer, push_producer, ProducerOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tidal_core::Result<()> {
//! let temperature = push_producer(ProducerOptions::new(), vec![18, 19, 21]);
//! let ticks = pull_producer(ProducerOptions::new().delay_ms(10), vec!["tick"]);
//!
//! let mut readings = ticks.with_latest(vec![temperature]);
//!
//! assert_eq!(readings.pull().await?, Step::Yield(("tick", vec![Some(21)])));
//! assert_eq!(readings.pull().await?, Step::Complete);
//! # Ok(())
//! # }
//! ```

mod implementation;

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use implementation::{spawn_auxiliary, LatestSlots, SharedSlots};
use parking_lot::Mutex;
use tidal_core::{BoxPushProducer, PullProducer, Step, StepResult, StreamTask};

/// What [`PullWithLatest`] yields: the main value and one slot per auxiliary.
pub type WithLatest<M, A> = (M, Vec<Option<A>>);

/// Pull producer returned by [`pull_with_latest`].
pub struct PullWithLatest<M, A, P> {
    main: P,
    slots: SharedSlots<A>,
    auxiliaries: Vec<StreamTask>,
    held: Option<M>,
    started: bool,
    done: bool,
}

/// Pairs `main` with the latest values of `auxiliaries`.
///
/// # Panics
///
/// Panics when `auxiliaries` is not empty and no tokio runtime is running.
pub fn pull_with_latest<M, A, P>(
    main: P,
    auxiliaries: impl IntoIterator<Item = BoxPushProducer<A>>,
) -> PullWithLatest<M, A, P>
where
    P: PullProducer<M>,
    A: Clone + Send + 'static,
{
    let auxiliaries: Vec<_> = auxiliaries.into_iter().collect();
    let slots = Arc::new(Mutex::new(LatestSlots::new(auxiliaries.len())));

    let auxiliaries = auxiliaries
        .into_iter()
        .enumerate()
        .map(|(index, producer)| spawn_auxiliary(index, producer, Arc::clone(&slots)))
        .collect();

    PullWithLatest {
        main,
        slots,
        auxiliaries,
        held: None,
        started: false,
        done: false,
    }
}

impl<M, A, P> PullWithLatest<M, A, P> {
    fn finish(&mut self) {
        self.done = true;
        self.held = None;
        // Dropping the handles cancels the auxiliaries
        self.auxiliaries.clear();
    }
}

impl<M, A, P> PullProducer<WithLatest<M, A>> for PullWithLatest<M, A, P>
where
    M: Send,
    A: Clone + Send + 'static,
    P: PullProducer<M>,
{
    fn pull(&mut self) -> BoxFuture<'_, StepResult<WithLatest<M, A>>> {
        async move {
            if self.done {
                return Ok(Step::Complete);
            }
            if !self.started {
                self.started = true;
                if !self.auxiliaries.is_empty() {
                    // One turn for the auxiliaries before the first snapshot
                    tokio::task::yield_now().await;
                }
            }

            let failure = self.slots.lock().take_failure();
            if let Some(error) = failure {
                return Err(error);
            }

            let value = match self.held.take() {
                Some(value) => value,
                None => match self.main.pull().await? {
                    Step::Yield(value) => value,
                    Step::Complete => {
                        self.finish();
                        return Ok(Step::Complete);
                    }
                },
            };

            let latest = {
                let mut slots = self.slots.lock();
                match slots.take_failure() {
                    Some(error) => Err(error),
                    None => Ok(slots.snapshot()),
                }
            };

            match latest {
                Ok(latest) => Ok(Step::Yield((value, latest))),
                Err(error) => {
                    self.held = Some(value);
                    Err(error)
                }
            }
        }
        .boxed()
    }
}

/// Extension trait providing the `with_latest` operator on pull producers.
pub trait WithLatestExt<M>: PullProducer<M> + Sized {
    /// Pairs every value of this producer with the latest values of `auxiliaries`.
    ///
    /// See the [module-level documentation](crate::with_latest) for details.
    fn with_latest<A>(
        self,
        auxiliaries: impl IntoIterator<Item = BoxPushProducer<A>>,
    ) -> PullWithLatest<M, A, Self>
    where
        A: Clone + Send + 'static,
    {
        pull_with_latest(self, auxiliaries)
    }
}

impl<M, P: PullProducer<M>> WithLatestExt<M> for P {}
