// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Result, StreamError};
use futures::future::{self, BoxFuture, FutureExt};

/// One unit of stream progress.
///
/// A failure is deliberately not a variant: the computation producing a step
/// is asynchronous, and a failed computation resolves to `Err(StreamError)`
/// instead of a `Step`. This keeps "the source said it is done" apart from
/// "obtaining the next step went wrong".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// A value-bearing step
    Yield(T),
    /// The stream is exhausted; nothing follows
    Complete,
}

/// The resolved outcome of a step computation.
pub type StepResult<T> = Result<Step<T>>;

/// A step that may still be computing.
pub type PendingStep<T> = BoxFuture<'static, StepResult<T>>;

impl<T> Step<T> {
    /// Returns `true` if this is a `Yield`.
    pub const fn is_yield(&self) -> bool {
        matches!(self, Step::Yield(_))
    }

    /// Returns `true` if this is `Complete`.
    pub const fn is_complete(&self) -> bool {
        matches!(self, Step::Complete)
    }

    /// Converts from `Step<T>` to `Option<T>`.
    pub fn into_value(self) -> Option<T> {
        match self {
            Step::Yield(value) => Some(value),
            Step::Complete => None,
        }
    }

    /// Borrows the carried value, if any.
    pub const fn as_value(&self) -> Option<&T> {
        match self {
            Step::Yield(value) => Some(value),
            Step::Complete => None,
        }
    }

    /// Maps a `Step<T>` to `Step<U>`; `Complete` is kept as is.
    pub fn map<U, F>(self, f: F) -> Step<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Step::Yield(value) => Step::Yield(f(value)),
            Step::Complete => Step::Complete,
        }
    }
}

impl<T> From<Option<T>> for Step<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Step::Complete, Step::Yield)
    }
}

/// An already resolved pending step.
pub fn ready<T: Send + 'static>(result: StepResult<T>) -> PendingStep<T> {
    future::ready(result).boxed()
}

/// A pending step that resolves to `Yield(value)`.
pub fn yielded<T: Send + 'static>(value: T) -> PendingStep<T> {
    ready(Ok(Step::Yield(value)))
}

/// A pending step that resolves to `Complete`.
pub fn completed<T: Send + 'static>() -> PendingStep<T> {
    ready(Ok(Step::Complete))
}

/// A pending step whose computation failed.
pub fn failed<T: Send + 'static>(error: StreamError) -> PendingStep<T> {
    ready(Err(error))
}
