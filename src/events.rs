//! Player event bus.
//!
//! Sessions publish notifications here; the player subscribes. Publishing is
//! fire-and-forget: with no subscribers, events are dropped.

use tokio::sync::broadcast;

/// Notifications raised towards the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The selected (or engine-applied) quality level changed.
    QualityChanged,
    /// The current audio track changed.
    AudioTrackChanged { id: String },
    /// A fault after the session became ready that recovery cannot handle.
    StreamError { session: String, message: String },
}

/// Broadcast bus cloned into every session.
#[derive(Clone, Debug)]
pub struct PlayerEventBus {
    tx: broadcast::Sender<PlayerEvent>,
}

impl PlayerEventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: PlayerEvent) {
        let _ = self.tx.send(event);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }
}

impl Default for PlayerEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
