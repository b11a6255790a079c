// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Extension traits shared by every producer.

use crate::error::Result;
use crate::protocol::{
    BoxPullProducer, BoxPushConsumer, BoxPushProducer, Flow, PullProducer, PushConsumer,
    PushOperator, PushProducer,
};
use crate::step::{self, Step, StepResult};
use core::marker::PhantomData;
use futures::future::{BoxFuture, FutureExt};

/// Extension trait for pull producers.
pub trait PullProducerExt<T>: PullProducer<T> + Sized {
    /// Answers `Complete` forever once the source completed, without pulling it again.
    fn fuse(self) -> Fuse<Self> {
        Fuse {
            source: self,
            done: false,
        }
    }

    /// Turns the pull producer into a push producer that drives its consumer
    /// with one pulled step at a time.
    fn into_push(self) -> IntoPush<Self> {
        IntoPush { source: self }
    }

    fn boxed(self) -> BoxPullProducer<T>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T, P: PullProducer<T>> PullProducerExt<T> for P {}

/// Extension trait for push producers.
pub trait PushProducerExt<T>: PushProducer<T> + Sized {
    /// Installs `operator` between this producer and the consumer it is later driven with.
    fn through<U, Op>(self, operator: Op) -> Through<Self, Op, T>
    where
        Op: PushOperator<T, U>,
    {
        Through {
            producer: self,
            operator,
            _marker: PhantomData,
        }
    }

    /// Drives `consumer` to completion.
    fn run<C>(self, consumer: C) -> BoxFuture<'static, Result<()>>
    where
        C: PushConsumer<T> + 'static,
    {
        <Self as PushProducer<T>>::drive(Box::new(self), Box::new(consumer))
    }

    fn boxed(self) -> BoxPushProducer<T>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T, P: PushProducer<T>> PushProducerExt<T> for P {}

/// Pull producer returned by [`PullProducerExt::fuse`].
pub struct Fuse<P> {
    source: P,
    done: bool,
}

impl<T, P> PullProducer<T> for Fuse<P>
where
    T: Send,
    P: PullProducer<T>,
{
    fn pull(&mut self) -> BoxFuture<'_, StepResult<T>> {
        async move {
            if self.done {
                return Ok(Step::Complete);
            }
            let step = self.source.pull().await?;
            self.done = step.is_complete();
            Ok(step)
        }
        .boxed()
    }
}

/// Push producer returned by [`PullProducerExt::into_push`].
pub struct IntoPush<P> {
    source: P,
}

impl<T, P> PushProducer<T> for IntoPush<P>
where
    T: Send + 'static,
    P: PullProducer<T> + 'static,
{
    fn drive(
        self: Box<Self>,
        mut consumer: BoxPushConsumer<T>,
    ) -> BoxFuture<'static, Result<()>> {
        let mut source = self.source;
        async move {
            loop {
                let step = source.pull().await;
                let complete = matches!(step, Ok(Step::Complete));

                if consumer.push(step::ready(step)).await? == Flow::Cancel {
                    trace!("into_push: consumer cancelled");
                    return Ok(());
                }
                if complete {
                    return Ok(());
                }
            }
        }
        .boxed()
    }
}

/// Push producer returned by [`PushProducerExt::through`].
pub struct Through<P, Op, T> {
    producer: P,
    operator: Op,
    _marker: PhantomData<fn() -> T>,
}

impl<T, U, P, Op> PushProducer<U> for Through<P, Op, T>
where
    P: PushProducer<T>,
    Op: PushOperator<T, U>,
{
    fn drive(self: Box<Self>, consumer: BoxPushConsumer<U>) -> BoxFuture<'static, Result<()>> {
        let Through {
            producer, operator, ..
        } = *self;
        <P as PushProducer<T>>::drive(Box::new(producer), operator.bind(consumer))
    }
}
