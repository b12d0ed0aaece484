//! The broker engine.
//!
//! [`Broker`] owns every queue, consumer group, in-flight set and subscription
//! behind one mutex. Each operation holds the lock from start to finish, so
//! callers never observe a half-applied update and a message moves between
//! containers (queue → in-flight → queue) without ever being in two at once.
//!
//! Nothing blocks waiting for data: receives return `None` immediately when
//! there is nothing deliverable.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::core::clock::{expiry_for, Clock, SystemClock, Ttl};
use crate::core::consumer::{ConsumerId, ConsumerRegistry};
use crate::core::error::BrokerError;
use crate::core::in_flight::InFlightTracker;
use crate::core::message::{new_message, with_custom_message, MessageId, Payload};
use crate::core::queue::QueueManager;
use crate::core::topics::{virtual_queue_key, SubscriptionRegistry};

/// A queue message handed to a consumer. It stays in flight until acked or nacked.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub consumer: ConsumerId,
    pub message_id: MessageId,
    pub payload: Payload,
}

/// A message popped from a subscriber's virtual topic queue. Not tracked after delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicDelivery {
    pub message_id: MessageId,
    pub payload: Payload,
}

/// What a successful nack did with the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NackOutcome {
    /// Put back at the tail of its queue.
    Requeued,
    /// Already expired; discarded.
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub name: String,
    /// Messages stored, including expired ones not yet reaped.
    pub depth: usize,
    pub in_flight: usize,
    pub consumers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerStats {
    pub queues: Vec<QueueStats>,
    pub subscription_patterns: usize,
}

/// Point-in-time listing of which message ids sit in which container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerSnapshot {
    pub queued: BTreeMap<String, Vec<MessageId>>,
    pub in_flight: BTreeMap<String, Vec<MessageId>>,
}

#[derive(Debug, Default)]
struct BrokerState {
    queues: QueueManager,
    consumers: ConsumerRegistry,
    in_flight: InFlightTracker,
    subscriptions: SubscriptionRegistry,
}

#[derive(Debug)]
pub struct Broker {
    state: Mutex<BrokerState>,
    clock: Arc<dyn Clock>,
    default_ttl: Ttl,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker {
    /// Empty broker on the wall clock with the standard 60 s TTL.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(BrokerState::default()),
            clock,
            default_ttl: Ttl::default(),
        }
    }

    /// TTL used when `send`/`publish` are given `None`.
    pub fn with_default_ttl(mut self, ttl: Ttl) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Ttl {
        self.default_ttl
    }

    // ───────────────────────────────────────────────────────────
    // Work queues
    // ───────────────────────────────────────────────────────────

    /// Appends a new message to `queue` and returns its id.
    pub fn send(&self, queue: &str, payload: Payload, ttl: Option<Ttl>) -> MessageId {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let mut state = self.state.lock();
        let message = new_message(payload, ttl, self.clock.now_ms());
        let id = message.id.clone();

        debug!(
            target: "ferrymq::broker",
            queue,
            message_id = %id,
            expires_at = message.expires_at,
            "enqueued"
        );
        state.queues.enqueue(queue, message);
        id
    }

    /// Adds `consumer` to the round-robin rotation of `queue`. Idempotent.
    pub fn register_consumer(&self, queue: &str, consumer: ConsumerId) {
        let mut state = self.state.lock();
        // The queue exists from first reference on.
        state.queues.get_or_create(queue);
        if state.consumers.register(queue, consumer.clone()) {
            debug!(target: "ferrymq::broker", queue, consumer = %consumer, "consumer registered");
        }
    }

    /// Dispatches the oldest live message of `queue` to the next consumer in rotation.
    ///
    /// Expired messages at the head are discarded first. Returns `None` if the
    /// queue has nothing live, or if nobody is registered; in the latter case
    /// the live head stays queued and the cursor does not move.
    pub fn receive(&self, queue: &str) -> Option<Delivery> {
        let mut state = self.state.lock();
        let now = self.clock.now_ms();
        let BrokerState {
            queues,
            consumers,
            in_flight,
            ..
        } = &mut *state;

        let pending = queues.get_or_create(queue);
        pending.peek_live_head(now)?;

        if !consumers.has_consumers(queue) {
            debug!(target: "ferrymq::broker", queue, "live message waiting, no consumers registered");
            return None;
        }
        let consumer = consumers.next_consumer(queue)?;
        let message = pending.pop_front()?;

        let delivery = Delivery {
            consumer,
            message_id: message.id.clone(),
            payload: message.payload.clone(),
        };
        debug!(
            target: "ferrymq::broker",
            queue,
            consumer = %delivery.consumer,
            message_id = %delivery.message_id,
            "dispatched"
        );
        in_flight.insert(queue, message);
        Some(delivery)
    }

    /// Settles an in-flight message for good.
    pub fn ack(&self, queue: &str, message_id: &str) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        match state.in_flight.take(queue, message_id) {
            Some(_) => {
                debug!(target: "ferrymq::broker", queue, message_id, "acked");
                Ok(())
            }
            None => Err(BrokerError::not_found(queue, message_id)),
        }
    }

    /// Releases an in-flight message: back to the tail of `queue` if it has not
    /// expired yet, otherwise dropped.
    pub fn nack(&self, queue: &str, message_id: &str) -> Result<NackOutcome, BrokerError> {
        let mut state = self.state.lock();
        let now = self.clock.now_ms();
        let message = state
            .in_flight
            .take(queue, message_id)
            .ok_or_else(|| BrokerError::not_found(queue, message_id))?;

        if message.can_requeue(now) {
            debug!(target: "ferrymq::broker", queue, message_id, "nacked, requeued at tail");
            state.queues.enqueue(queue, message);
            Ok(NackOutcome::Requeued)
        } else {
            debug!(target: "ferrymq::broker", queue, message_id, "nacked after expiry, dropped");
            Ok(NackOutcome::Dropped)
        }
    }

    // ───────────────────────────────────────────────────────────
    // Topics
    // ───────────────────────────────────────────────────────────

    /// Attaches `subscriber` to the exact pattern string `pattern`. Idempotent.
    pub fn subscribe(&self, pattern: &str, subscriber: ConsumerId) {
        let mut state = self.state.lock();
        if state.subscriptions.subscribe(pattern, subscriber.clone()) {
            debug!(target: "ferrymq::broker", pattern, subscriber = %subscriber, "subscribed");
        }
    }

    /// Fans a message out to every subscriber of every pattern matching `topic`.
    ///
    /// All copies share one id and expiry. Each lands in the virtual queue
    /// keyed by the matching pattern and the subscriber. A topic nobody
    /// matches produces no copies.
    pub fn publish(&self, topic: &str, payload: Payload, ttl: Option<Ttl>) -> MessageId {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let id = MessageId::generate();
        let mut state = self.state.lock();
        let expires_at = expiry_for(self.clock.now_ms(), ttl);
        let BrokerState {
            queues,
            subscriptions,
            ..
        } = &mut *state;

        let mut copies = 0usize;
        for subscription in subscriptions.matching(topic) {
            for subscriber in subscription.subscribers() {
                let key = virtual_queue_key(subscription.pattern().as_str(), subscriber);
                queues.enqueue(
                    &key,
                    with_custom_message(id.clone(), payload.clone(), expires_at),
                );
                copies += 1;
            }
        }

        debug!(target: "ferrymq::broker", topic, message_id = %id, copies, "published");
        id
    }

    /// Pops the oldest live message from the virtual queue `topic:subscriber`.
    ///
    /// `topic` is used verbatim as the key prefix; it must equal the pattern
    /// string the subscriber registered with, not the published topic.
    pub fn receive_topic(&self, topic: &str, subscriber: &str) -> Option<TopicDelivery> {
        let key = virtual_queue_key(topic, subscriber);
        let mut state = self.state.lock();
        let now = self.clock.now_ms();

        let message = state.queues.get_or_create(&key).pop_live_head(now)?;
        debug!(target: "ferrymq::broker", key = %key, message_id = %message.id, "topic delivery");
        Some(TopicDelivery {
            message_id: message.id,
            payload: message.payload,
        })
    }

    // ───────────────────────────────────────────────────────────
    // Introspection
    // ───────────────────────────────────────────────────────────

    /// Per-queue counters, sorted by queue name. Does not reap expired messages.
    pub fn stats(&self) -> BrokerStats {
        let state = self.state.lock();
        let mut queues: Vec<QueueStats> = state
            .queues
            .iter()
            .map(|(name, queue)| QueueStats {
                name: name.to_owned(),
                depth: queue.len(),
                in_flight: state.in_flight.len_of(name),
                consumers: state.consumers.count_for(name),
            })
            .collect();
        queues.sort_by(|a, b| a.name.cmp(&b.name));

        BrokerStats {
            queues,
            subscription_patterns: state.subscriptions.pattern_count(),
        }
    }

    pub fn snapshot(&self) -> BrokerSnapshot {
        let state = self.state.lock();
        let queued = state
            .queues
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(name, queue)| (name.to_owned(), queue.ids().cloned().collect()))
            .collect();
        let in_flight = state
            .in_flight
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(name, set)| (name.to_owned(), set.keys().cloned().collect()))
            .collect();

        BrokerSnapshot { queued, in_flight }
    }
}
