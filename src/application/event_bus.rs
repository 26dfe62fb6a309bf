//! Broadcast fan-out for session events.
//!
//! The controller records events in its outbox; whoever drives the
//! controller drains the outbox and publishes here so any number of hosts
//! (panel, logger, tests) can observe them. Sequence numbers are assigned
//! by the outbox and pass through unchanged.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::models::EventBusConfig;
use crate::services::EventEnvelope;

pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
    published: AtomicU64,
}

impl EventBus {
    pub fn new(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            published: AtomicU64::new(0),
        }
    }

    /// Broadcast one event. Having no subscribers is not an error.
    pub fn publish(&self, envelope: EventEnvelope) {
        self.published.fetch_add(1, Ordering::SeqCst);
        if envelope.payload.is_diagnostic() {
            warn!(sequence = %envelope.sequence, event = envelope.payload.name(), "diagnostic event");
        } else {
            debug!(sequence = %envelope.sequence, event = envelope.payload.name(), "event published");
        }
        let _ = self.sender.send(envelope);
    }

    pub fn publish_all(&self, envelopes: Vec<EventEnvelope>) {
        for envelope in envelopes {
            self.publish(envelope);
        }
    }

    /// Subscribe to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Number of events published so far.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EventBusConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{EventOutbox, SessionEvent};
    use chrono::Utc;

    #[tokio::test]
    async fn test_publish_and_subscribe() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let mut outbox = EventOutbox::new();
        outbox.record(Utc::now(), SessionEvent::PlanSkipped);
        outbox.record(
            Utc::now(),
            SessionEvent::NavigateToRange {
                range: "B7".to_string(),
            },
        );
        bus.publish_all(outbox.drain());

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.payload, SessionEvent::PlanSkipped);
        assert!(second.sequence > first.sequence);
        assert_eq!(bus.published_count(), 2);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        let mut outbox = EventOutbox::new();
        outbox.record(Utc::now(), SessionEvent::PlanSkipped);
        bus.publish_all(outbox.drain());
        assert_eq!(bus.published_count(), 1);
    }
}
