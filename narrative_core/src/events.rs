//! Notifications the engine publishes while processing memories.

use serde::{Deserialize, Serialize};

use story_rules::{ArcId, MemoryId, PlayerId, WorldEventId, WorldEventType};

/// Something observable happened to a player's story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NarrativeEvent {
    /// A memory was appended to the player's log.
    MemoryAdded { player: PlayerId, memory: MemoryId },

    /// An arc reached a chapter that unlocks something. Published exactly
    /// once per such advance.
    ChapterEvent {
        player: PlayerId,
        arc: ArcId,
        chapter: u32,
        unlock: String,
    },

    /// A world event fired for the player.
    WorldEventTriggered {
        player: PlayerId,
        event: WorldEventId,
        event_type: WorldEventType,
        title: String,
    },
}

impl NarrativeEvent {
    pub fn player(&self) -> &PlayerId {
        match self {
            NarrativeEvent::MemoryAdded { player, .. }
            | NarrativeEvent::ChapterEvent { player, .. }
            | NarrativeEvent::WorldEventTriggered { player, .. } => player,
        }
    }
}

/// Receives narrative events, e.g. a UI layer showing chapter unlocks.
pub trait NarrativeSubscriber: Send {
    fn on_event(&mut self, event: &NarrativeEvent);
}

impl<F> NarrativeSubscriber for F
where
    F: FnMut(&NarrativeEvent) + Send,
{
    fn on_event(&mut self, event: &NarrativeEvent) {
        self(event)
    }
}

/// Fan-out of narrative events to subscribers, in subscription order.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn NarrativeSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn NarrativeSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn publish(&mut self, event: NarrativeEvent) {
        tracing::trace!(
            player = %event.player(),
            subscribers = self.subscribers.len(),
            "publishing narrative event"
        );
        for subscriber in &mut self.subscribers {
            subscriber.on_event(&event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_every_subscriber_receives_each_event() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for name in ["ui", "audit"] {
            let sink = Arc::clone(&seen);
            bus.subscribe(Box::new(move |event: &NarrativeEvent| {
                sink.lock().unwrap().push((name, event.clone()));
            }));
        }

        let event = NarrativeEvent::MemoryAdded {
            player: PlayerId::new("p1"),
            memory: MemoryId::new(),
        };
        bus.publish(event.clone());

        let seen = seen.lock().unwrap();
        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(*seen, vec![("ui", event.clone()), ("audit", event)]);
    }
}
