// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Tidal
//!
//! Async streams in two flavors, with a handful of combinators on top.
//!
//! ## Overview
//!
//! A stream advances one step at a time: a value, or the end. A step is the
//! outcome of an asynchronous computation, which may fail; failures travel
//! with the steps until a terminal consumer decides what to do with them.
//!
//! - **Pull**: whoever holds a [`PullProducer`] asks it for the next step.
//! - **Push**: a [`PushProducer`] drives a [`PushConsumer`], which answers
//!   every step with [`Flow::Continue`] or [`Flow::Cancel`].
//!
//! | Combinator | Protocol | Extension |
//! |------------|----------|-----------|
//! | scan | push | [`ScanExt`] |
//! | take | push | [`TakeItemsExt`] |
//! | distinct | push and pull | [`DistinctExt`], [`PullDistinctExt`] |
//! | merge | pull | [`MergeExt`] |
//! | with latest | pull main, push auxiliaries | [`WithLatestExt`] |
//!
//! ## Quick Start
//!
//! ```rust
//! use tidal::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tidal::Result<()> {
//! let mut values = vec![3, 3, 4, 4, 5].into_iter();
//! let source = pull_fn(move || {
//!     let step = Step::from(values.next());
//!     async move { Ok(step) }
//! });
//!
//! let mut seen = Vec::new();
//! drain(source.distinct_until_changed(), ErrorPolicy::FailFast, |notification| {
//!     if let Notification::Yield(value) = notification {
//!         seen.push(value);
//!     }
//!     async { Ok(Flow::Continue) }
//! })
//! .await?;
//!
//! assert_eq!(seen, vec![3, 4, 5]);
//! # Ok(())
//! # }
//! ```
//!
//! Merge and with-latest keep their sources busy in tasks spawned on the
//! ambient tokio runtime.

pub use tidal_core::{
    drain, pull_fn, push_fn, sink, BoxPullProducer, BoxPushConsumer, BoxPushProducer,
    ErrorPolicy, Flow, Notification, PendingStep, PullProducer, PullProducerExt, PushConsumer,
    PushOperator, PushProducer, PushProducerExt, Result, Step, StepResult, StreamError,
};
pub use tidal_stream::{
    pull_distinct, pull_merge, pull_with_latest, push_distinct, push_scan, push_scan_async,
    push_take, DistinctExt, MergeExt, PullDistinctExt, ScanExt, TakeItemsExt, WithLatest,
    WithLatestExt,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use tidal_core::{
        drain, pull_fn, push_fn, sink, BoxPullProducer, BoxPushConsumer, BoxPushProducer,
        ErrorPolicy, Flow, Notification, PullProducer, PullProducerExt, PushConsumer,
        PushProducer, PushProducerExt, Step, StreamError,
    };
    pub use tidal_stream::{
        pull_merge, pull_with_latest, DistinctExt, MergeExt, PullDistinctExt, ScanExt,
        TakeItemsExt, WithLatestExt,
    };
}
