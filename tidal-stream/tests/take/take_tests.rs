// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use tidal_core::PushProducerExt;
use tidal_stream::{push_take, TakeItemsExt};
use tidal_test_utils::{
    completed_with, numbers, push_consumer, push_producer, ConsumerOptions, ProducerOptions,
    Received, Recorder,
};

async fn take_from_four(n: isize) -> anyhow::Result<Vec<Received<i32>>> {
    let recorder = Recorder::new();
    push_producer(ProducerOptions::new(), numbers(4))
        .take_items(n)
        .run(push_consumer(ConsumerOptions::new(), &recorder))
        .await?;
    Ok(recorder.calls())
}

#[tokio::test]
async fn test_take_positive() -> anyhow::Result<()> {
    assert_eq!(take_from_four(2).await?, completed_with([0, 1]));
    Ok(())
}

#[tokio::test]
async fn test_take_positive_overflow() -> anyhow::Result<()> {
    assert_eq!(take_from_four(10).await?, completed_with([0, 1, 2, 3]));
    Ok(())
}

#[tokio::test]
async fn test_take_negative() -> anyhow::Result<()> {
    assert_eq!(take_from_four(-2).await?, completed_with([2, 3]));
    Ok(())
}

#[tokio::test]
async fn test_take_negative_overflow() -> anyhow::Result<()> {
    assert_eq!(take_from_four(-10).await?, completed_with([0, 1, 2, 3]));
    Ok(())
}

#[tokio::test]
async fn test_take_zero() -> anyhow::Result<()> {
    assert_eq!(take_from_four(0).await?, vec![Received::Complete]);
    Ok(())
}

#[tokio::test]
async fn test_take_zero_never_awaits_the_first_step() -> anyhow::Result<()> {
    // Arrange - awaiting step 0 would fail the stream
    let recorder = Recorder::new();

    // Act
    push_producer(ProducerOptions::new().error_at_step(0), numbers(4))
        .take_items(0)
        .run(push_consumer(ConsumerOptions::new(), &recorder))
        .await?;

    // Assert
    assert_eq!(recorder.calls(), vec![Received::Complete]);

    Ok(())
}

#[tokio::test]
async fn test_take_cancels_producer_once_satisfied() -> anyhow::Result<()> {
    // Arrange - the producer would crash if asked for a third step
    let recorder = Recorder::new();

    // Act
    push_producer(ProducerOptions::new().crash_at_step(2), numbers(4))
        .take_items(2)
        .run(push_consumer(ConsumerOptions::new(), &recorder))
        .await?;

    // Assert
    assert_eq!(recorder.calls(), completed_with([0, 1]));

    Ok(())
}

#[tokio::test]
async fn test_take_delivers_cancel_to_producer() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    push_producer(ProducerOptions::new(), numbers(4))
        .take_items(3)
        .run(push_consumer(ConsumerOptions::new().cancel_at_step(1), &recorder))
        .await?;

    // Assert
    assert_eq!(recorder.calls(), vec![Received::Yield(0), Received::Yield(1)]);

    Ok(())
}

#[tokio::test]
async fn test_take_negative_stops_flushing_on_cancel() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();

    // Act
    push_producer(ProducerOptions::new(), numbers(4))
        .through(push_take(-3))
        .run(push_consumer(ConsumerOptions::new().cancel_at_step(1), &recorder))
        .await?;

    // Assert
    assert_eq!(recorder.calls(), vec![Received::Yield(1), Received::Yield(2)]);

    Ok(())
}

#[tokio::test]
async fn test_take_handles_consumer_crash() {
    // Arrange
    let recorder = Recorder::new();

    // Act
    let result = push_producer(ProducerOptions::new(), numbers(4))
        .take_items(3)
        .run(push_consumer(ConsumerOptions::new().crash_at_step(1), &recorder))
        .await;

    // Assert
    assert!(result.unwrap_err().is_downstream_crash());
    assert_eq!(recorder.calls(), vec![Received::Yield(0)]);
}
