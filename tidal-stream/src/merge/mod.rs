// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Races several pull producers into one.
//!
//! Every live source always has one request in flight, whether or not the
//! merged producer is being pulled, so a slow source never starves the others.
//! Each pull on the merged producer returns whichever result settled first.
//!
//! # Behavior
//!
//! - **No sources**: every pull returns `Complete`
//! - **One source**: the source itself is returned
//! - **Ordering**: each source's own order is kept; across sources only
//!   "first settled, first returned" holds
//! - **Completion**: the merged producer completes once every source completed
//! - **Failures**: a failing source is retired and its failure is returned by the
//!   pull it settles; a source that panics while being pulled fails the same way.
//!   Other sources keep running, so a continue-on-error consumer can drain them.
//! - **Cancellation**: dropping the merged producer cancels every request still in flight
//!
//! Requests run as tasks on the ambient tokio runtime, so a merge of two or more
//! sources must be created inside one.
//!
//! # Example
//!
//! ```rust
//! use tidal_core::{PullProducer, Step};
//! use tidal_stream::pull_merge;
//! use tidal_test_utils::{pull_producer, ProducerOptions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tidal_core::Result<()> {
//! let fast = pull_producer(ProducerOptions::new().delay_ms(10), vec!["fast"]);
//! let slow = pull_producer(ProducerOptions::new().delay_ms(50), vec!["slow"]);
//!
//! let mut merged = pull_merge(vec![slow, fast]);
//!
//! assert_eq!(merged.pull().await?, Step::Yield("fast"));
//! assert_eq!(merged.pull().await?, Step::Yield("slow"));
//! assert_eq!(merged.pull().await?, Step::Complete);
//! # Ok(())
//! # }
//! ```

mod implementation;

use implementation::PullMerge;
use tidal_core::{BoxPullProducer, PullProducer, PullProducerExt};

/// Merges `sources` into one pull producer.
pub fn pull_merge<T>(sources: impl IntoIterator<Item = BoxPullProducer<T>>) -> BoxPullProducer<T>
where
    T: Send + 'static,
{
    let mut sources: Vec<_> = sources.into_iter().collect();
    if sources.len() == 1 {
        if let Some(source) = sources.pop() {
            return source;
        }
    }
    Box::new(PullMerge::new(sources))
}

/// Extension trait providing the `merge_with` operator on pull producers.
pub trait MergeExt<T>: PullProducer<T> + Sized {
    /// Races this producer against `others`.
    ///
    /// See the [module-level documentation](crate::merge) for details.
    fn merge_with(self, others: impl IntoIterator<Item = BoxPullProducer<T>>) -> BoxPullProducer<T>
    where
        Self: 'static,
        T: Send + 'static,
    {
        pull_merge(std::iter::once(self.boxed()).chain(others))
    }
}

impl<T, P: PullProducer<T>> MergeExt<T> for P {}
