//! Synchronous publish/subscribe bus with hierarchical topics.
//!
//! Topics are dot-separated strings (`APP.READY`). A subscriber registered on
//! a prefix topic (`APP`) also receives messages published on its sub-topics.
//!
//! # Delivery guarantees
//!
//! - **Synchronous**: [`PubSub::publish`] returns after every subscriber ran
//! - **FIFO per topic**: subscribers of a topic run in subscription order
//! - **Most specific first**: `APP.READY` subscribers run before `APP` subscribers
//! - **Reentrant**: callbacks may publish or subscribe; the subscriber list is
//!   snapshotted before delivery, so new subscriptions see the next message
//!
//! # Example
//!
//! ```
//! use launchpad_core::bus::PubSub;
//! use std::sync::{Arc, Mutex};
//!
//! let bus: PubSub<u32> = PubSub::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! bus.subscribe("APP", move |topic, value| {
//!     sink.lock().unwrap().push((topic.to_string(), *value));
//! });
//!
//! assert!(bus.publish("APP.READY", &7));
//! assert_eq!(seen.lock().unwrap().as_slice(), &[("APP.READY".to_string(), 7)]);
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Topic separator used for hierarchical delivery.
pub const TOPIC_SEPARATOR: char = '.';

/// Subscriber callback: receives the published topic and the message.
pub type Subscriber<M> = Arc<dyn Fn(&str, &M) + Send + Sync>;

/// Handle returned by [`PubSub::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    topic: String,
    id: u64,
}

impl SubscriptionToken {
    /// Topic this subscription was registered on.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

struct Registry<M> {
    next_id: u64,
    topics: BTreeMap<String, Vec<(u64, Subscriber<M>)>>,
}

/// Publish/subscribe bus carrying messages of type `M`.
pub struct PubSub<M> {
    registry: Mutex<Registry<M>>,
}

impl<M> PubSub<M> {
    /// Create an empty bus.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                next_id: 0,
                topics: BTreeMap::new(),
            }),
        }
    }

    // A panicking subscriber must not take the whole bus down with it.
    fn lock(&self) -> MutexGuard<'_, Registry<M>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `callback` for `topic` and every sub-topic of it.
    pub fn subscribe<F>(&self, topic: &str, callback: F) -> SubscriptionToken
    where
        F: Fn(&str, &M) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .topics
            .entry(topic.to_string())
            .or_default()
            .push((id, Arc::new(callback)));
        tracing::trace!(topic, id, "Subscribed");
        SubscriptionToken {
            topic: topic.to_string(),
            id,
        }
    }

    /// Deliver `message` to subscribers of `topic` and of its ancestors.
    ///
    /// Returns `true` if at least one subscriber was notified.
    pub fn publish(&self, topic: &str, message: &M) -> bool {
        let subscribers = self.subscribers_for(topic);
        tracing::trace!(topic, subscribers = subscribers.len(), "Publishing");
        for subscriber in &subscribers {
            subscriber(topic, message);
        }
        !subscribers.is_empty()
    }

    fn subscribers_for(&self, topic: &str) -> Vec<Subscriber<M>> {
        let registry = self.lock();
        let mut current = Some(topic);
        let mut out = Vec::new();
        while let Some(name) = current {
            if let Some(list) = registry.topics.get(name) {
                out.extend(list.iter().map(|(_, callback)| Arc::clone(callback)));
            }
            current = name.rfind(TOPIC_SEPARATOR).map(|at| &name[..at]);
        }
        out
    }

    /// Remove a single subscription. Returns `true` if it was registered.
    pub fn unsubscribe(&self, token: &SubscriptionToken) -> bool {
        let mut registry = self.lock();
        let Some(list) = registry.topics.get_mut(&token.topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != token.id);
        let removed = list.len() != before;
        if list.is_empty() {
            registry.topics.remove(&token.topic);
        }
        removed
    }

    /// Remove every subscription on `topic` and on its sub-topics.
    ///
    /// Returns the number of subscriptions removed.
    pub fn unsubscribe_topic(&self, topic: &str) -> usize {
        let mut registry = self.lock();
        let prefix = format!("{topic}{TOPIC_SEPARATOR}");
        let mut removed = 0;
        registry.topics.retain(|name, list| {
            let matches = name == topic || name.starts_with(&prefix);
            if matches {
                removed += list.len();
            }
            !matches
        });
        removed
    }

    /// Number of subscriptions registered directly on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.lock().topics.get(topic).map_or(0, Vec::len)
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.lock().topics.clear();
    }
}

impl<M> Default for PubSub<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for PubSub<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.lock();
        f.debug_struct("PubSub")
            .field("topics", &registry.topics.keys().collect::<Vec<_>>())
            .finish()
    }
}
