// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Stream combinators for the tidal push and pull protocols.
//!
//! # Push operators
//!
//! Installed between a push producer and its consumer, either as values
//! ([`push_scan`], [`push_take`], [`push_distinct`]) passed to
//! [`PushProducerExt::through`](tidal_core::PushProducerExt::through), or
//! through the extension traits:
//!
//! | Operator | Extension | Purpose |
//! |----------|-----------|---------|
//! | [`scan`] | [`ScanExt`] | Running accumulation |
//! | [`take`] | [`TakeItemsExt`] | First or last `n` steps |
//! | [`distinct`] | [`DistinctExt`] | Adjacency filter |
//!
//! # Pull operators
//!
//! | Operator | Extension | Purpose |
//! |----------|-----------|---------|
//! | [`pull_distinct`] | [`PullDistinctExt`] | Adjacency filter |
//! | [`merge`] | [`MergeExt`] | Races several pull producers |
//! | [`with_latest`] | [`WithLatestExt`] | Pairs pulls with the latest push values |
//!
//! Operators never retry and never swallow failures; whether a failure ends
//! the stream is decided by the consumer at the end of the chain.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
#[macro_use]
mod logging;
pub mod distinct;
pub mod merge;
pub mod scan;
pub mod take;
pub mod with_latest;

pub use distinct::{
    pull_distinct, push_distinct, DistinctExt, PullDistinct, PullDistinctExt, PushDistinct,
};
pub use merge::{pull_merge, MergeExt};
pub use scan::{push_scan, push_scan_async, PushScan, ScanExt};
pub use take::{push_take, PushTake, TakeItemsExt};
pub use with_latest::{pull_with_latest, PullWithLatest, WithLatest, WithLatestExt};
