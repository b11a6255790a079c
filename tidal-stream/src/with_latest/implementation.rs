// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::pin::pin;
use std::sync::Arc;

use futures::future::{self, BoxFuture, Either, FutureExt};
use parking_lot::Mutex;
use tidal_core::step::PendingStep;
use tidal_core::{
    BoxPushProducer, CancellationToken, Flow, PushConsumer, PushProducer, Result, Step,
    StreamError, StreamTask,
};

/// Latest value and pending failure of every auxiliary slot.
pub(super) struct LatestSlots<A> {
    values: Vec<Option<A>>,
    failures: Vec<Option<StreamError>>,
}

impl<A: Clone> LatestSlots<A> {
    pub(super) fn new(size: usize) -> Self {
        Self {
            values: vec![None; size],
            failures: vec![None; size],
        }
    }

    fn insert(&mut self, index: usize, value: A) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = Some(value);
        }
    }

    fn fail(&mut self, index: usize, error: StreamError) {
        if let Some(slot) = self.failures.get_mut(index) {
            *slot = Some(error);
        }
    }

    /// Removes and returns the failure of the lowest failed slot.
    pub(super) fn take_failure(&mut self) -> Option<StreamError> {
        self.failures.iter_mut().find_map(Option::take)
    }

    pub(super) fn snapshot(&self) -> Vec<Option<A>> {
        self.values.clone()
    }
}

pub(super) type SharedSlots<A> = Arc<Mutex<LatestSlots<A>>>;

/// Drives auxiliary producer `index` into its slot until it finishes or
/// `cancel` fires.
pub(super) fn spawn_auxiliary<A>(
    index: usize,
    producer: BoxPushProducer<A>,
    slots: SharedSlots<A>,
) -> StreamTask
where
    A: Clone + Send + 'static,
{
    StreamTask::spawn(move |cancel| async move {
        let consumer = LatestConsumer {
            index,
            slots,
            cancel: cancel.clone(),
        };

        let driving =
            <dyn PushProducer<A> as PushProducer<A>>::drive(producer, Box::new(consumer));
        match future::select(pin!(cancel.cancelled()), driving).await {
            Either::Left(_) => trace!("with_latest: auxiliary {index} cancelled"),
            Either::Right((Ok(()), _)) => trace!("with_latest: auxiliary {index} finished"),
            Either::Right((Err(error), _)) => {
                warn!("with_latest: auxiliary {index} stopped: {error}");
            }
        }
    })
}

struct LatestConsumer<A> {
    index: usize,
    slots: SharedSlots<A>,
    cancel: CancellationToken,
}

impl<A: Clone + Send + 'static> PushConsumer<A> for LatestConsumer<A> {
    fn push(&mut self, step: PendingStep<A>) -> BoxFuture<'_, Result<Flow>> {
        async move {
            // A cancelled auxiliary does not compute another step
            if self.cancel.is_cancelled() {
                return Ok(Flow::Cancel);
            }
            let result = step.await;
            if self.cancel.is_cancelled() {
                return Ok(Flow::Cancel);
            }

            match result {
                Ok(Step::Yield(value)) => self.slots.lock().insert(self.index, value),
                Ok(Step::Complete) => return Ok(Flow::Cancel),
                Err(error) => {
                    debug!("with_latest: auxiliary {} failure cached: {error}", self.index);
                    self.slots.lock().fail(self.index, error);
                }
            }
            Ok(Flow::Continue)
        }
        .boxed()
    }
}
