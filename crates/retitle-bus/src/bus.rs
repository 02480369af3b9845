//! Topic-keyed event bus.
//!
//! # Guarantees
//!
//! - Emission is fire-and-forget: the event is cloned into every channel
//!   subscribed to its topic and dropped (with a log line) when the topic
//!   has none.
//! - A single producer's sequential emits to one topic arrive in emission
//!   order; nothing is guaranteed across topics.
//! - No persistence, no redelivery, no dead-lettering. A handler that fails
//!   has simply consumed its event.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tracing::debug;

use retitle_models::{Event, Topic};

/// Receiving half of a topic subscription.
pub type Subscription = mpsc::UnboundedReceiver<Event>;

type SenderMap = HashMap<Topic, Vec<mpsc::UnboundedSender<Event>>>;

/// In-process event bus with one channel per subscriber per topic.
///
/// Clones share the same subscriber registry, so any holder of the bus can
/// emit to subscribers registered through any other clone.
#[derive(Clone, Default)]
pub struct EventBus {
    senders: Arc<RwLock<SenderMap>>,
}

impl EventBus {
    /// Create a new bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a topic.
    ///
    /// Events emitted before subscription are not received. Intended to be
    /// called once per handler during startup wiring.
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(topic)
            .or_default()
            .push(tx);
        rx
    }

    /// Emit an event to every subscriber of its topic (fire-and-forget).
    ///
    /// Returns the number of channels the event was delivered to. Zero is
    /// not an error: terminal events routinely have no consumer.
    pub fn emit(&self, event: Event) -> usize {
        let topic = event.topic();
        let guard = self.senders.read().unwrap_or_else(|e| e.into_inner());

        let mut delivered = 0;
        if let Some(subs) = guard.get(&topic) {
            for tx in subs {
                if tx.send(event.clone()).is_ok() {
                    delivered += 1;
                }
            }
        }

        if delivered == 0 {
            debug!(topic = %topic, "No subscribers, event dropped");
        } else {
            debug!(topic = %topic, delivered, "Event emitted");
        }
        delivered
    }

    /// Number of subscriptions registered for a topic, dropped receivers
    /// included.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.senders
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&topic)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.senders.read().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("EventBus")
            .field("topics", &guard.len())
            .finish()
    }
}
