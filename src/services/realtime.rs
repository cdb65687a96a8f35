use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::models::BookingChange;

const CHANNEL_CAPACITY: usize = 256;

/// In-process fan-out of booking changes. Cloning shares the same channel.
#[derive(Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<BookingChange>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, change: BookingChange) {
        tracing::debug!(booking_id = %change.booking_id(), kind = change.kind(), "publishing booking change");
        // No receivers is fine
        let _ = self.tx.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingChange> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Handle to a listener started by [`setup_realtime_bookings`]. The listener
/// stops when this is dropped.
pub struct RealtimeSubscription {
    handle: JoinHandle<()>,
}

impl RealtimeSubscription {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Calls `callback` for every change published on `bus` until the returned
/// subscription is dropped. Must be called inside a tokio runtime.
pub fn setup_realtime_bookings<F>(bus: &ChangeBus, mut callback: F) -> RealtimeSubscription
where
    F: FnMut(&BookingChange) + Send + 'static,
{
    let mut rx = bus.subscribe();
    let handle = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(change) => callback(&change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "realtime listener lagged, changes dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
    RealtimeSubscription { handle }
}
