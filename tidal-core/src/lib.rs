// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Protocol primitives for push and pull async streams.
//!
//! A stream makes progress one [`Step`] at a time. Two dual protocols move
//! steps around:
//!
//! - a [`PullProducer`] is asked for each step by whoever holds it;
//! - a [`PushProducer`] takes a [`PushConsumer`] and drives it.
//!
//! Failures are values in flight: a step whose computation failed resolves to
//! `Err(StreamError)` and travels the same path as regular steps until a
//! terminal consumer decides, through its [`ErrorPolicy`], whether the stream
//! ends there.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
pub mod adapters;
pub mod error;
pub mod protocol;
pub mod sink;
pub mod step;
pub mod task;

pub use self::adapters::{Fuse, IntoPush, PullProducerExt, PushProducerExt, Through};
pub use self::error::{Result, StreamError};
pub use self::protocol::{
    pull_fn, push_fn, BoxPullProducer, BoxPushConsumer, BoxPushProducer, Flow, PullFn,
    PullProducer, PushConsumer, PushFn, PushOperator, PushProducer,
};
pub use self::sink::{drain, sink, ErrorPolicy, Notification, Sink};
pub use self::step::{PendingStep, Step, StepResult};
pub use self::task::StreamTask;
pub use tokio_util::sync::CancellationToken;
