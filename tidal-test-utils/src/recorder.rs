// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use std::sync::Arc;
use tidal_core::Notification;

/// What a harness consumer handed to its sink, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received<T> {
    Yield(T),
    Complete,
    /// A failure delivered under continue-on-error
    Failure,
}

impl<T> From<Notification<T>> for Received<T> {
    fn from(notification: Notification<T>) -> Self {
        match notification {
            Notification::Yield(value) => Received::Yield(value),
            Notification::Complete => Received::Complete,
            Notification::Failure(_) => Received::Failure,
        }
    }
}

/// Shared, cloneable log of everything a sink received.
#[derive(Debug)]
pub struct Recorder<T> {
    calls: Arc<Mutex<Vec<Received<T>>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, received: impl Into<Received<T>>) {
        self.calls.lock().push(received.into());
    }

    /// Snapshot of every call so far.
    pub fn calls(&self) -> Vec<Received<T>> {
        self.calls.lock().clone()
    }

    /// Only the yielded values, in order.
    pub fn values(&self) -> Vec<T> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Received::Yield(value) => Some(value.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Yields of `values` followed by `Complete`.
pub fn completed_with<T>(values: impl IntoIterator<Item = T>) -> Vec<Received<T>> {
    values
        .into_iter()
        .map(Received::Yield)
        .chain(core::iter::once(Received::Complete))
        .collect()
}
