/// In-process event fan-out connecting the tool bridge (publisher) to the
/// view endpoints (subscribers).
///
/// Publish is fire-and-forget: with zero subscribers the event is dropped
/// silently — no queueing, no replay. A subscriber registered after a publish
/// does not receive it retroactively; consumers compensate by reading the
/// store once before subscribing.
use tokio::sync::broadcast;
use tracing::debug;

use crate::api::Recomendaciones;

/// The two event kinds the store can emit. `RecursosActualizados` carries no
/// payload; subscribers re-read the store.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    RecomendacionesActualizadas(Recomendaciones),
    RecursosActualizados,
}

pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(32);
        Self { sender }
    }

    /// Dispatch an event to all currently-registered subscribers.
    pub fn publish(&self, event: StoreEvent) {
        debug!(?event, subscribers = self.sender.receiver_count(), "publishing store event");
        // send() errs only when there are no receivers; that is the
        // fire-and-forget case, not a failure.
        let _ = self.sender.send(event);
    }

    /// Register a subscriber. Dropping the receiver deregisters it.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
