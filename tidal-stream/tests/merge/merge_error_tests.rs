// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tidal_stream::pull_merge;
use tidal_test_utils::{
    numbers, pull_consumer, pull_producer, ConsumerOptions, ProducerOptions, Received, Recorder,
};

#[tokio::test(start_paused = true)]
async fn test_merge_propagates_producer_error() {
    // Arrange - a settles 0 at 5ms, b fails at 8ms
    let recorder = Recorder::new();
    let a = pull_producer(ProducerOptions::new().delay_ms(5), numbers(2));
    let b = pull_producer(ProducerOptions::new().delay_ms(8).error_at_step(0), numbers(2));

    // Act
    let result = pull_consumer(ConsumerOptions::new(), &recorder, pull_merge(vec![a, b])).await;

    // Assert
    assert!(result.unwrap_err().is_upstream());
    assert_eq!(recorder.calls(), vec![Received::Yield(0)]);
}

#[tokio::test(start_paused = true)]
async fn test_merge_retires_failed_source_and_continues() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();
    let a = pull_producer(ProducerOptions::new().delay_ms(10), numbers(2));
    let b = pull_producer(ProducerOptions::new().delay_ms(5).error_at_step(0), numbers(2));

    // Act
    pull_consumer(
        ConsumerOptions::new().continue_on_error(),
        &recorder,
        pull_merge(vec![a, b]),
    )
    .await?;

    // Assert - b is not asked again after failing
    assert_eq!(
        recorder.calls(),
        vec![
            Received::Failure,
            Received::Yield(0),
            Received::Yield(1),
            Received::Complete,
        ]
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_merge_handles_producer_crash() {
    // Arrange
    let recorder = Recorder::new();
    let a = pull_producer(ProducerOptions::new().delay_ms(10), numbers(2));
    let b = pull_producer(ProducerOptions::new().crash_at_step(0), numbers(2));

    // Act
    let result = pull_consumer(ConsumerOptions::new(), &recorder, pull_merge(vec![a, b])).await;

    // Assert
    assert!(result.unwrap_err().is_upstream());
    assert!(recorder.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_merge_survives_producer_crash_with_continue_on_error() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();
    let a = pull_producer(ProducerOptions::new().delay_ms(10), numbers(2));
    let b = pull_producer(ProducerOptions::new().crash_at_step(1), numbers(2));

    // Act
    pull_consumer(
        ConsumerOptions::new().continue_on_error(),
        &recorder,
        pull_merge(vec![a, b]),
    )
    .await?;

    // Assert
    assert_eq!(
        recorder.calls(),
        vec![
            Received::Yield(0),
            Received::Failure,
            Received::Yield(0),
            Received::Yield(1),
            Received::Complete,
        ]
    );

    Ok(())
}
