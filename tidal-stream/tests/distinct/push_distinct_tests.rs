// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tidal_core::{PushProducerExt, StreamError};
use tidal_stream::{push_distinct, DistinctExt};
use tidal_test_utils::{
    completed_with, numbers, push_consumer, push_producer, ConsumerOptions, ProducerOptions,
    Received, Recorder,
};

#[tokio::test]
async fn test_distinct_until_changed_drops_repeats() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    push_producer(ProducerOptions::new(), vec![1, 1, 2, 2, 3, 1])
        .distinct_until_changed()
        .run(push_consumer(ConsumerOptions::new(), &recorder))
        .await?;

    // Assert
    assert_eq!(recorder.calls(), completed_with([1, 2, 3, 1]));

    Ok(())
}

#[tokio::test]
async fn test_distinct_by_compares_with_last_forwarded() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act - only strictly increasing values pass
    push_producer(ProducerOptions::new(), vec![1, 3, 2, 4, 4, 5])
        .distinct_by(|previous: Option<&i32>, next: &i32| {
            Ok(previous.map_or(true, |previous| next > previous))
        })
        .run(push_consumer(ConsumerOptions::new(), &recorder))
        .await?;

    // Assert
    assert_eq!(recorder.calls(), completed_with([1, 3, 4, 5]));

    Ok(())
}

#[tokio::test]
async fn test_distinct_first_comparison_has_no_previous() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act - rejecting the first value keeps rejecting everything
    push_producer(ProducerOptions::new(), numbers(3))
        .through(push_distinct(|previous: Option<&i32>, _: &i32| Ok(previous.is_some())))
        .run(push_consumer(ConsumerOptions::new(), &recorder))
        .await?;

    // Assert
    assert_eq!(recorder.calls(), vec![Received::Complete]);

    Ok(())
}

#[tokio::test]
async fn test_distinct_dropped_values_do_not_count_as_consumer_steps() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    push_producer(ProducerOptions::new(), vec![5, 5, 5, 6, 7])
        .distinct_until_changed()
        .run(push_consumer(ConsumerOptions::new().cancel_at_step(1), &recorder))
        .await?;

    // Assert
    assert_eq!(recorder.calls(), vec![Received::Yield(5), Received::Yield(6)]);

    Ok(())
}

#[tokio::test]
async fn test_distinct_predicate_error_fails_the_step() {
    // Arrange
    let recorder = Recorder::new();

    // Act
    let result = push_producer(ProducerOptions::new(), numbers(4))
        .distinct_by(|_: Option<&i32>, next: &i32| {
            if *next == 2 {
                Err(StreamError::transform("cannot compare 2"))
            } else {
                Ok(true)
            }
        })
        .run(push_consumer(ConsumerOptions::new(), &recorder))
        .await;

    // Assert
    assert!(result.unwrap_err().is_transform());
    assert_eq!(recorder.values(), vec![0, 1]);
}

#[tokio::test]
async fn test_distinct_predicate_error_with_continue_on_error() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    push_producer(ProducerOptions::new(), numbers(4))
        .distinct_by(|_: Option<&i32>, next: &i32| {
            if *next == 2 {
                Err(StreamError::transform("cannot compare 2"))
            } else {
                Ok(true)
            }
        })
        .run(push_consumer(ConsumerOptions::new().continue_on_error(), &recorder))
        .await?;

    // Assert
    assert_eq!(
        recorder.calls(),
        vec![
            Received::Yield(0),
            Received::Yield(1),
            Received::Failure,
            Received::Yield(3),
            Received::Complete,
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_distinct_forwards_upstream_errors() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    push_producer(ProducerOptions::new().error_at_step(1), vec![1, 1, 1, 2])
        .distinct_until_changed()
        .run(push_consumer(ConsumerOptions::new().continue_on_error(), &recorder))
        .await?;

    // Assert
    assert_eq!(
        recorder.calls(),
        vec![
            Received::Yield(1),
            Received::Failure,
            Received::Yield(2),
            Received::Complete,
        ]
    );

    Ok(())
}
