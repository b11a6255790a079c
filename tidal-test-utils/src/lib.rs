// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test harness for the tidal stream protocol.
//!
//! Producers and consumers here are ordinary implementations of the pull and
//! push contracts, scripted to misbehave on demand:
//!
//! - [`ProducerOptions`]: per-step delay, a failing step, a crashing step;
//! - [`ConsumerOptions`]: per-step delay, cancel or crash at a step, and the
//!   consumer-side [`ErrorPolicy`](tidal_core::ErrorPolicy).
//!
//! Consumers write what they observe into a shared [`Recorder`], which tests
//! compare against a list of [`Received`] entries.
//!
//! ```rust
//! use tidal_core::PushProducerExt;
//! use tidal_test_utils::{
//!     completed_with, numbers, push_consumer, push_producer, ConsumerOptions, ProducerOptions,
//!     Recorder,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tidal_core::Result<()> {
//! let recorder = Recorder::new();
//! push_producer(ProducerOptions::new(), numbers(3))
//!     .run(push_consumer(ConsumerOptions::new(), &recorder))
//!     .await?;
//!
//! assert_eq!(recorder.calls(), completed_with([0, 1, 2]));
//! # Ok(())
//! # }
//! ```
//!
//! This crate is for tests only.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod consumers;
pub mod options;
pub mod producers;
pub mod recorder;
pub mod test_data;

pub use consumers::{pull_consumer, push_consumer};
pub use options::{ConsumerOptions, ProducerOptions};
pub use producers::{pull_producer, push_producer};
pub use recorder::{completed_with, Received, Recorder};
pub use test_data::{numbers, strings};
