// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Recording consumers for both protocols.
//!
//! Consumer steps are counted per notification, `Complete` and delivered
//! failures included.

use crate::options::ConsumerOptions;
use crate::recorder::Recorder;
use futures::future::{BoxFuture, FutureExt};
use tidal_core::{drain, sink, BoxPushConsumer, Flow, Notification, PullProducer, Result, StreamError};
use tokio::time::sleep;

/// A push consumer recording into `recorder`.
pub fn push_consumer<T>(options: ConsumerOptions, recorder: &Recorder<T>) -> BoxPushConsumer<T>
where
    T: Clone + Send + 'static,
{
    let policy = options.policy;
    Box::new(sink(policy, recording_handler(options, recorder.clone())))
}

/// Pulls `producer` to its end, recording into `recorder`.
///
/// Resolves to `Err` on an unrecovered failure or a consumer crash.
pub async fn pull_consumer<T, P>(
    options: ConsumerOptions,
    recorder: &Recorder<T>,
    producer: P,
) -> Result<()>
where
    T: Clone + Send + 'static,
    P: PullProducer<T>,
{
    let policy = options.policy;
    drain(producer, policy, recording_handler(options, recorder.clone())).await
}

fn recording_handler<T>(
    options: ConsumerOptions,
    recorder: Recorder<T>,
) -> impl FnMut(Notification<T>) -> BoxFuture<'static, Result<Flow>> + Send
where
    T: Clone + Send + 'static,
{
    let mut next_step = 0;
    move |notification| {
        let step = next_step;
        next_step += 1;
        let recorder = recorder.clone();
        let delay = options.delay;
        let cancel_at_step = options.cancel_at_step;
        let crash_at_step = options.crash_at_step;

        async move {
            if crash_at_step == Some(step) {
                return Err(StreamError::downstream_crash(format!(
                    "consumer crashed at step {step}"
                )));
            }
            if !delay.is_zero() {
                sleep(delay).await;
            }
            recorder.record(notification);

            Ok(if cancel_at_step == Some(step) {
                Flow::Cancel
            } else {
                Flow::Continue
            })
        }
        .boxed()
    }
}
