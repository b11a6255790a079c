// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use tidal_core::ErrorPolicy;

/// Behaviour of a harness producer.
///
/// Steps are counted from zero in the order they are requested; the step
/// after the last data item is the `Complete` step.
#[derive(Debug, Clone, Default)]
pub struct ProducerOptions {
    pub delay: Duration,
    pub error_at_step: Option<usize>,
    pub crash_at_step: Option<usize>,
}

impl ProducerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every step takes `delay` to compute.
    #[must_use]
    pub fn delay_ms(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    /// The computation of step `step` fails with an upstream failure.
    #[must_use]
    pub fn error_at_step(mut self, step: usize) -> Self {
        self.error_at_step = Some(step);
        self
    }

    /// Requesting step `step` crashes the producer instead of returning a step.
    #[must_use]
    pub fn crash_at_step(mut self, step: usize) -> Self {
        self.crash_at_step = Some(step);
        self
    }
}

/// Behaviour of a harness consumer.
#[derive(Debug, Clone, Default)]
pub struct ConsumerOptions {
    pub delay: Duration,
    pub cancel_at_step: Option<usize>,
    pub crash_at_step: Option<usize>,
    pub policy: ErrorPolicy,
}

impl ConsumerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acknowledging each step takes `delay`.
    #[must_use]
    pub fn delay_ms(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    /// Records step `step`, then asks for cancellation.
    #[must_use]
    pub fn cancel_at_step(mut self, step: usize) -> Self {
        self.cancel_at_step = Some(step);
        self
    }

    /// Crashes on step `step` without recording it.
    #[must_use]
    pub fn crash_at_step(mut self, step: usize) -> Self {
        self.crash_at_step = Some(step);
        self
    }

    #[must_use]
    pub fn continue_on_error(mut self) -> Self {
        self.policy = ErrorPolicy::Continue;
        self
    }
}
