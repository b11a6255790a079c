// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Scripted producers for both protocols.
//!
//! Both producers walk a data vector and turn index `i` into step `i`:
//! `Yield(data[i])` while data lasts, then `Complete`. [`ProducerOptions`]
//! delays every step, fails one step, or crashes the producer at one step.

use crate::options::ProducerOptions;
use futures::future::FutureExt;
use tidal_core::{
    pull_fn, push_fn, BoxPullProducer, BoxPushConsumer, BoxPushProducer, PendingStep, Step,
    StreamError,
};
use tokio::time::sleep;

/// A pull producer over `data`.
///
/// A crash is a panic raised by the `pull` call itself, before any pending
/// step exists.
pub fn pull_producer<T>(options: ProducerOptions, data: Vec<T>) -> BoxPullProducer<T>
where
    T: Clone + Send + 'static,
{
    let mut next_step = 0;
    Box::new(pull_fn(move || {
        let index = next_step;
        next_step += 1;
        if options.crash_at_step == Some(index) {
            panic!("producer crashed at step {index}");
        }
        pending_step(&options, &data, index)
    }))
}

/// A push producer over `data`.
///
/// Each pushed step is still pending when the consumer receives it. A crash
/// stops the producer before it pushes that step and fails its completion.
pub fn push_producer<T>(options: ProducerOptions, data: Vec<T>) -> BoxPushProducer<T>
where
    T: Clone + Send + 'static,
{
    Box::new(push_fn(move |mut consumer: BoxPushConsumer<T>| async move {
        for index in 0..=data.len() {
            if options.crash_at_step == Some(index) {
                return Err(StreamError::upstream(format!(
                    "producer crashed at step {index}"
                )));
            }

            let last = index == data.len();
            let flow = consumer.push(pending_step(&options, &data, index)).await?;
            if last || flow.is_cancel() {
                break;
            }
        }
        Ok(())
    }))
}

fn pending_step<T>(options: &ProducerOptions, data: &[T], index: usize) -> PendingStep<T>
where
    T: Clone + Send + 'static,
{
    let delay = options.delay;
    let outcome = if options.error_at_step == Some(index) {
        Err(StreamError::upstream(format!("producer error at step {index}")))
    } else {
        Ok(Step::from(data.get(index).cloned()))
    };

    async move {
        if !delay.is_zero() {
            sleep(delay).await;
        }
        outcome
    }
    .boxed()
}
