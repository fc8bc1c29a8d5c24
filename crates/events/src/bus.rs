//! Event publishing/subscription abstraction (mechanics only).
//!
//! The guard layer publishes a notification after every successful login so
//! that unrelated parts of the application (audit logs, "last seen" tracking,
//! session bookkeeping) can react without the authenticator knowing about them.
//!
//! The bus is optional for publishers: having no bus configured is a valid
//! setup and simply means nobody is listening.
//!
//! Delivery is best-effort fan-out. Subscribers receive messages in publish
//! order for a single publisher; nothing is persisted.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use thiserror::Error;

/// A subscription to an event stream.
///
/// Each subscription gets a copy of every message published after it was
/// created (broadcast semantics).
///
/// ```ignore
/// let subscription = bus.subscribe();
/// while let Ok(event) = subscription.recv_timeout(Duration::from_secs(1)) {
///     audit(event);
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

    /// Drain every message that is already queued.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Internal lock poisoning; the bus can no longer fan out.
    #[error("event bus lock poisoned")]
    Poisoned,

    /// Transport-specific failure.
    #[error("event bus transport error: {0}")]
    Transport(String),
}

/// Domain-agnostic pub/sub bus.
///
/// The error type is fixed so the trait stays object safe: publishers hold an
/// `Arc<dyn EventBus<M>>` and do not care which transport sits behind it.
pub trait EventBus<M>: Send + Sync {
    fn publish(&self, message: M) -> Result<(), BusError>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    fn publish(&self, message: M) -> Result<(), BusError> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
