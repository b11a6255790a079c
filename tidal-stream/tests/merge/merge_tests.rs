// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tidal_core::{pull_fn, BoxPullProducer, PullProducer, PullProducerExt, Step};
use tidal_stream::{pull_merge, MergeExt};
use tidal_test_utils::{
    completed_with, numbers, pull_consumer, pull_producer, strings, ConsumerOptions,
    ProducerOptions, Received, Recorder,
};
use tokio::time::{sleep, Instant};

fn labelled(label: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{label}{i}")).collect()
}

/// Endless source counting how often it was pulled.
fn counting(pulls: &Arc<AtomicUsize>, delay_ms: u64) -> BoxPullProducer<usize> {
    let pulls = Arc::clone(pulls);
    pull_fn(move || {
        let tick = pulls.fetch_add(1, Ordering::SeqCst);
        async move {
            sleep(Duration::from_millis(delay_ms)).await;
            Ok(Step::Yield(tick))
        }
    })
    .boxed()
}

#[tokio::test(start_paused = true)]
async fn test_merge_emits_in_settle_order() -> anyhow::Result<()> {
    // Arrange - a settles at 10, 20, 30; b settles at 14, 28
    let recorder = Recorder::new();
    let a = pull_producer(ProducerOptions::new().delay_ms(10), labelled("a", 3));
    let b = pull_producer(ProducerOptions::new().delay_ms(14), labelled("b", 2));

    // Act
    pull_consumer(ConsumerOptions::new(), &recorder, pull_merge(vec![a, b])).await?;

    // Assert
    assert_eq!(
        recorder.calls(),
        completed_with(["a0", "b0", "a1", "b1", "a2"].map(String::from))
    );

    Ok(())
}

#[tokio::test]
async fn test_merge_keeps_per_source_order() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();
    let a = pull_producer(ProducerOptions::new(), labelled("a", 3));
    let b = pull_producer(ProducerOptions::new(), labelled("b", 2));

    // Act
    pull_consumer(ConsumerOptions::new(), &recorder, a.merge_with(vec![b])).await?;

    // Assert
    let values = recorder.values();
    let from = |label: char| -> Vec<String> {
        values.iter().filter(|v| v.starts_with(label)).cloned().collect()
    };
    assert_eq!(values.len(), 5);
    assert_eq!(from('a'), labelled("a", 3));
    assert_eq!(from('b'), labelled("b", 2));
    assert_eq!(recorder.calls().last(), Some(&Received::Complete));

    Ok(())
}

#[tokio::test]
async fn test_merge_single_producer_is_passthrough() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();
    let only = pull_producer(ProducerOptions::new(), strings(3));

    // Act
    pull_consumer(ConsumerOptions::new(), &recorder, pull_merge(vec![only])).await?;

    // Assert
    assert_eq!(recorder.calls(), completed_with(strings(3)));

    Ok(())
}

#[tokio::test]
async fn test_merge_no_producers_completes_immediately() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::<i32>::new();
    let mut merged = pull_merge(Vec::new());

    // Act & Assert
    assert_eq!(merged.pull().await?, Step::Complete);
    assert_eq!(merged.pull().await?, Step::Complete);
    pull_consumer(ConsumerOptions::new(), &recorder, merged).await?;
    assert_eq!(recorder.calls(), vec![Received::Complete]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_merge_handles_consumer_delay() -> anyhow::Result<()> {
    // Arrange
    let recorder = Recorder::new();
    let a = pull_producer(ProducerOptions::new(), numbers(2));
    let b = pull_producer(ProducerOptions::new(), numbers(2));

    // Act
    pull_consumer(ConsumerOptions::new().delay_ms(30), &recorder, pull_merge(vec![a, b])).await?;

    // Assert
    let mut values = recorder.values();
    values.sort_unstable();
    assert_eq!(values, vec![0, 0, 1, 1]);
    assert_eq!(recorder.calls().last(), Some(&Received::Complete));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_merge_requests_all_sources_concurrently() -> anyhow::Result<()> {
    // Arrange - each source needs 40ms on its own: three values and Complete
    let recorder = Recorder::new();
    let a = pull_producer(ProducerOptions::new().delay_ms(10), numbers(3));
    let b = pull_producer(ProducerOptions::new().delay_ms(10), numbers(3));
    let start = Instant::now();

    // Act
    pull_consumer(ConsumerOptions::new(), &recorder, pull_merge(vec![a, b])).await?;

    // Assert
    assert!(start.elapsed() < Duration::from_millis(60));
    assert_eq!(recorder.values().len(), 6);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_merge_drop_cancels_outstanding_requests() -> anyhow::Result<()> {
    // Arrange
    let pulls = Arc::new(AtomicUsize::new(0));
    let mut merged = pull_merge(vec![counting(&pulls, 10), counting(&pulls, 10)]);

    // Act
    assert!(merged.pull().await?.is_yield());
    drop(merged);
    let after_drop = pulls.load(Ordering::SeqCst);
    sleep(Duration::from_millis(100)).await;

    // Assert
    assert_eq!(pulls.load(Ordering::SeqCst), after_drop);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_merge_requests_again_while_consumer_is_idle() -> anyhow::Result<()> {
    // Arrange
    let a_pulls = Arc::new(AtomicUsize::new(0));
    let b_pulls = Arc::new(AtomicUsize::new(0));
    let mut merged = pull_merge(vec![counting(&a_pulls, 10), counting(&b_pulls, 12)]);

    // Act
    let first = merged.pull().await?;
    sleep(Duration::from_millis(100)).await;

    // Assert - every source holds one settled result and has the next request in flight
    assert_eq!(first, Step::Yield(0));
    assert_eq!(a_pulls.load(Ordering::SeqCst), 3);
    assert_eq!(b_pulls.load(Ordering::SeqCst), 2);

    Ok(())
}
