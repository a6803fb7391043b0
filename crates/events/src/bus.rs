//! Observer registration and fan-out (mechanics only).
//!
//! Views register interest by subscribing; the store publishes one envelope per
//! completed mutation. Publication happens synchronously inside the mutating
//! call, so by the time a mutation returns every live subscription already
//! holds the envelope describing it.
//!
//! Subscribers read the store itself for current values; the envelope only says
//! what changed. There is no persistence: a subscription only sees envelopes
//! published after it was created.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to the change stream.
///
/// Each subscription gets a copy of every envelope published to the bus
/// (broadcast semantics).
///
/// ## Usage Pattern
///
/// ```ignore
/// let subscription = store.subscribe();
/// store.update_robot_status(&id, RobotStatus::Idle)?;
///
/// for envelope in subscription.drain() {
///     feed.apply(&envelope)?;
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Take every message already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// This is the seam between the store and its observers. The in-memory
/// implementation covers the single-process dashboard; a remote transport could
/// be substituted without changing the store's mutation signatures.
///
/// ## Delivery
///
/// - Messages arrive in publication order per subscription.
/// - Dropped subscriptions are pruned on the next publish.
///
/// `publish()` can fail (e.g. lock poisoning). The caller decides whether that
/// is fatal; the store logs it and keeps the completed write.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
