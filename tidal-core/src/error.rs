// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the tidal stream protocol
//!
//! Failures travel through the same channel as steps: a pending step whose
//! computation failed resolves to `Err(StreamError)`. The variants follow the
//! three places a failure can originate.
//!
//! # Examples
//!
//! ```
//! use tidal_core::{Result, Step, StreamError};
//!
//! fn next_reading(raw: &str) -> Result<Step<u32>> {
//!     raw.parse()
//!         .map(Step::Yield)
//!         .map_err(|e| StreamError::upstream(format!("bad reading {raw:?}: {e}")))
//! }
//!
//! assert!(next_reading("12").is_ok());
//! assert!(next_reading("x").unwrap_err().is_upstream());
//! ```

/// Root error type for every tidal operation
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// A producer's step computation failed or crashed
    #[error("Upstream failure: {context}")]
    UpstreamFailure {
        /// Description of what went wrong while computing the step
        context: String,
    },

    /// A reducer or predicate handed to an operator failed
    #[error("Transform failure: {context}")]
    TransformFailure {
        /// Description of the failing transformation
        context: String,
    },

    /// A consumer crashed instead of acknowledging a step
    #[error("Downstream crash: {context}")]
    DownstreamCrash {
        /// Description of the crash
        context: String,
    },

    /// Custom error from user code
    ///
    /// Wraps errors produced by user-provided producers, reducers and
    /// predicates so they can flow through the stream unchanged.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StreamError {
    /// Create an upstream failure with the given context
    pub fn upstream(context: impl Into<String>) -> Self {
        Self::UpstreamFailure {
            context: context.into(),
        }
    }

    /// Create a transform failure with the given context
    pub fn transform(context: impl Into<String>) -> Self {
        Self::TransformFailure {
            context: context.into(),
        }
    }

    /// Create a downstream crash with the given context
    pub fn downstream_crash(context: impl Into<String>) -> Self {
        Self::DownstreamCrash {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamFailure { .. })
    }

    #[must_use]
    pub const fn is_transform(&self) -> bool {
        matches!(self, Self::TransformFailure { .. })
    }

    #[must_use]
    pub const fn is_downstream_crash(&self) -> bool {
        matches!(self, Self::DownstreamCrash { .. })
    }
}

/// Specialized Result type for tidal operations
pub type Result<T> = std::result::Result<T, StreamError>;

impl Clone for StreamError {
    fn clone(&self) -> Self {
        match self {
            Self::UpstreamFailure { context } => Self::UpstreamFailure {
                context: context.clone(),
            },
            Self::TransformFailure { context } => Self::TransformFailure {
                context: context.clone(),
            },
            Self::DownstreamCrash { context } => Self::DownstreamCrash {
                context: context.clone(),
            },
            // The boxed error cannot be cloned, keep its rendered message
            Self::UserError(e) => Self::TransformFailure {
                context: format!("User error: {e}"),
            },
        }
    }
}
