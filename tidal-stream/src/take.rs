// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Push operator bounding the number of forwarded steps.
//!
//! # Arguments
//!
//! * `n > 0` - forwards the first `n` steps, then synthesizes `Complete` and
//!   cancels the producer.
//! * `n == 0` - synthesizes `Complete` on the very first push, without
//!   awaiting the step, and cancels the producer.
//! * `n < 0` - buffers the last `|n|` yields and flushes them, oldest first,
//!   once the producer completes.
//!
//! # Error Handling
//!
//! **Important:** with `n > 0`, failures count as steps for the purpose of the
//! limit. Taking 2 from `[Error, 1, 2, 3]` under continue-on-error forwards
//! `[Error, 1]` and then completes.
//!
//! With `n < 0`, failures are not buffered: they are forwarded as soon as they
//! arrive.
//!
//! # Examples
//!
//! ```rust
//! use tidal_core::PushProducerExt;
//! use tidal_stream::TakeItemsExt;
//! use tidal_test_utils::{completed_with, numbers, push_consumer, push_producer, ConsumerOptions, ProducerOptions, Recorder};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tidal_core::Result<()> {
//! let recorder = Recorder::new();
//!
//! push_producer(ProducerOptions::new(), numbers(4))
//!     .take_items(-2)
//!     .run(push_consumer(ConsumerOptions::new(), &recorder))
//!     .await?;
//!
//! assert_eq!(recorder.calls(), completed_with([2, 3]));
//! # Ok(())
//! # }
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;

use futures::future::{BoxFuture, FutureExt};
use tidal_core::step::{self, PendingStep};
use tidal_core::{
    BoxPushConsumer, Flow, PushConsumer, PushOperator, PushProducer, PushProducerExt, Result,
    Step, Through,
};

/// Push operator returned by [`push_take`].
#[derive(Debug, Clone, Copy)]
pub struct PushTake {
    n: isize,
}

/// Creates a take operator; see the [module-level documentation](crate::take).
pub fn push_take(n: isize) -> PushTake {
    PushTake { n }
}

enum Window<T> {
    Nothing,
    First { remaining: usize },
    Last { capacity: usize, buffer: VecDeque<T> },
}

impl<T: Send + 'static> PushOperator<T, T> for PushTake {
    fn bind(self, downstream: BoxPushConsumer<T>) -> BoxPushConsumer<T> {
        let window = match self.n.cmp(&0) {
            Ordering::Equal => Window::Nothing,
            Ordering::Greater => Window::First {
                remaining: self.n.unsigned_abs(),
            },
            Ordering::Less => Window::Last {
                capacity: self.n.unsigned_abs(),
                buffer: VecDeque::new(),
            },
        };

        Box::new(TakeConsumer {
            window,
            downstream,
            finished: false,
        })
    }
}

struct TakeConsumer<T> {
    window: Window<T>,
    downstream: BoxPushConsumer<T>,
    finished: bool,
}

impl<T: Send + 'static> TakeConsumer<T> {
    async fn complete(&mut self) -> Result<Flow> {
        self.finished = true;
        self.downstream.push(step::completed()).await?;
        Ok(Flow::Cancel)
    }

    async fn take_first(&mut self, step: PendingStep<T>) -> Result<Flow> {
        let result = step.await;
        if matches!(result, Ok(Step::Complete)) {
            return self.complete().await;
        }

        let exhausted = match &mut self.window {
            Window::First { remaining } => {
                *remaining -= 1;
                *remaining == 0
            }
            _ => false,
        };

        let flow = self.downstream.push(step::ready(result)).await?;
        if flow.is_cancel() {
            self.finished = true;
            Ok(Flow::Cancel)
        } else if exhausted {
            self.complete().await
        } else {
            Ok(Flow::Continue)
        }
    }

    async fn take_last(&mut self, step: PendingStep<T>) -> Result<Flow> {
        match step.await {
            Ok(Step::Yield(value)) => {
                if let Window::Last { capacity, buffer } = &mut self.window {
                    if buffer.len() == *capacity {
                        buffer.pop_front();
                    }
                    buffer.push_back(value);
                }
                Ok(Flow::Continue)
            }
            Ok(Step::Complete) => {
                let buffered = match &mut self.window {
                    Window::Last { buffer, .. } => std::mem::take(buffer),
                    _ => VecDeque::new(),
                };
                for value in buffered {
                    if self.downstream.push(step::yielded(value)).await?.is_cancel() {
                        self.finished = true;
                        return Ok(Flow::Cancel);
                    }
                }
                self.complete().await
            }
            Err(error) => self.downstream.push(step::failed(error)).await,
        }
    }
}

impl<T: Send + 'static> PushConsumer<T> for TakeConsumer<T> {
    fn push(&mut self, step: PendingStep<T>) -> BoxFuture<'_, Result<Flow>> {
        async move {
            if self.finished {
                return Ok(Flow::Cancel);
            }
            match self.window {
                // The step is dropped without being awaited
                Window::Nothing => self.complete().await,
                Window::First { .. } => self.take_first(step).await,
                Window::Last { .. } => self.take_last(step).await,
            }
        }
        .boxed()
    }
}

/// Extension trait providing the `take_items` operator on push producers.
pub trait TakeItemsExt<T>: PushProducer<T> + Sized {
    /// Bounds the number of forwarded steps.
    ///
    /// See the [module-level documentation](crate::take) for the meaning of `n`.
    fn take_items(self, n: isize) -> Through<Self, PushTake, T>
    where
        T: Send + 'static,
    {
        self.through::<T, _>(push_take(n))
    }
}

impl<T, P: PushProducer<T>> TakeItemsExt<T> for P {}
