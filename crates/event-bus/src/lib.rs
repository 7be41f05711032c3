use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use factlens_core_types::{CoreError, Envelope, HelperHandle};

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Clone + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Event for T where T: Clone + Send + Sync + std::fmt::Debug + 'static {}

#[async_trait]
pub trait EventBus<E>: Send + Sync
where
    E: Event,
{
    async fn publish(&self, event: E) -> Result<(), CoreError>;
    fn subscribe(&self) -> broadcast::Receiver<E>;
}

/// In-memory broadcast bus. Publishing with no live subscriber is an error so
/// that senders notice when nobody is listening any more.
pub struct InMemoryBus<E>
where
    E: Event,
{
    sender: broadcast::Sender<E>,
}

impl<E> InMemoryBus<E>
where
    E: Event,
{
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self { sender })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl<E> EventBus<E> for InMemoryBus<E>
where
    E: Event,
{
    async fn publish(&self, event: E) -> Result<(), CoreError> {
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|err| CoreError::new(err.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}

/// Sending half handed to a helper context: every message it emits is stamped
/// with the helper's handle.
pub struct Outbox<E>
where
    E: Event,
{
    sender: HelperHandle,
    bus: Arc<InMemoryBus<Envelope<E>>>,
}

impl<E> Clone for Outbox<E>
where
    E: Event,
{
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            bus: Arc::clone(&self.bus),
        }
    }
}

impl<E> Outbox<E>
where
    E: Event,
{
    pub fn new(sender: HelperHandle, bus: Arc<InMemoryBus<Envelope<E>>>) -> Self {
        Self { sender, bus }
    }

    pub fn sender(&self) -> &HelperHandle {
        &self.sender
    }

    /// Same bus, different stamp.
    pub fn with_sender(&self, sender: HelperHandle) -> Self {
        Self {
            sender,
            bus: Arc::clone(&self.bus),
        }
    }

    pub async fn emit(&self, event: E) -> Result<(), CoreError> {
        self.bus
            .publish(Envelope::new(self.sender.clone(), event))
            .await
    }
}

/// Subscription that only yields messages from one helper surface.
///
/// Dropping it unsubscribes from the bus.
pub struct ScopedReceiver<E>
where
    E: Event,
{
    inner: broadcast::Receiver<Envelope<E>>,
    sender: HelperHandle,
}

impl<E> ScopedReceiver<E>
where
    E: Event,
{
    pub fn new(inner: broadcast::Receiver<Envelope<E>>, sender: HelperHandle) -> Self {
        Self { inner, sender }
    }

    pub fn sender(&self) -> &HelperHandle {
        &self.sender
    }

    /// Next message from the scoped sender, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            match self.inner.recv().await {
                Ok(envelope) if envelope.sender == self.sender => return Some(envelope.event),
                Ok(envelope) => {
                    debug!(
                        expected = %self.sender,
                        actual = %envelope.sender,
                        "dropping message from foreign helper"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "scoped receiver lagged behind the bus");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_subscribers_fails() {
        let bus = InMemoryBus::<u32>::new(4);
        assert!(bus.publish(1).await.is_err());
    }

    #[tokio::test]
    async fn scoped_receiver_skips_foreign_senders() {
        let bus = InMemoryBus::<Envelope<&'static str>>::new(8);
        let mine = HelperHandle::from("mine");
        let mut rx = ScopedReceiver::new(bus.subscribe(), mine.clone());

        Outbox::new(HelperHandle::from("stale"), Arc::clone(&bus))
            .emit("stale")
            .await
            .unwrap();
        Outbox::new(mine, Arc::clone(&bus))
            .emit("fresh")
            .await
            .unwrap();

        assert_eq!(rx.recv().await, Some("fresh"));
    }

    #[tokio::test]
    async fn dropping_receiver_unsubscribes() {
        let bus = InMemoryBus::<Envelope<u8>>::new(2);
        let rx = ScopedReceiver::new(bus.subscribe(), HelperHandle::new());
        assert_eq!(bus.subscriber_count(), 1);
        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
