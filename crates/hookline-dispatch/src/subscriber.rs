//! Subscribers: objects that declare several listener interests at once.
//!
//! A subscriber reports a declarative list of [`Subscription`]s. The registry
//! resolves that list once per `add_subscriber` / `remove_subscriber` call
//! into individual listener registrations. Subscribers should hand out the
//! same `Arc` handles every time they are asked, otherwise removal cannot
//! match what was added.

use std::sync::Arc;

use crate::types::{EventName, Priority};

/// One handler a subscriber wants attached to an event.
pub struct HandlerSpec<L: ?Sized> {
    pub listener: Arc<L>,
    /// Overrides the priority passed to `add_subscriber` when set.
    pub priority: Option<Priority>,
}

impl<L: ?Sized> Clone for HandlerSpec<L> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
            priority: self.priority,
        }
    }
}

/// All handlers a subscriber attaches to a single event, in order.
pub struct Subscription<L: ?Sized> {
    pub event: EventName,
    pub handlers: Vec<HandlerSpec<L>>,
}

impl<L: ?Sized> Subscription<L> {
    /// Start an empty subscription for `event`.
    pub fn new(event: impl Into<EventName>) -> Self {
        Self {
            event: event.into(),
            handlers: Vec::new(),
        }
    }

    /// Append a handler that uses the subscriber-wide priority.
    pub fn handler(mut self, listener: Arc<L>) -> Self {
        self.handlers.push(HandlerSpec {
            listener,
            priority: None,
        });
        self
    }

    /// Append a handler with its own priority.
    pub fn handler_with_priority(mut self, listener: Arc<L>, priority: Priority) -> Self {
        self.handlers.push(HandlerSpec {
            listener,
            priority: Some(priority),
        });
        self
    }
}

impl<L: ?Sized> Clone for Subscription<L> {
    fn clone(&self) -> Self {
        Self {
            event: self.event.clone(),
            handlers: self.handlers.clone(),
        }
    }
}

/// Object that reports the events it is interested in.
pub trait EventSubscriber<L: ?Sized>: Send + Sync {
    /// The subscriber's interests, resolved at registration time.
    fn subscribed_events(&self) -> Vec<Subscription<L>>;
}

/// A subscriber interest flattened to a single registration.
pub(crate) struct Resolved<L: ?Sized> {
    pub event: EventName,
    pub listener: Arc<L>,
    pub priority: Priority,
}

/// Flatten a subscriber's interests, applying `default_priority` wherever
/// a handler does not name its own.
pub(crate) fn resolve<L: ?Sized>(
    subscriber: &dyn EventSubscriber<L>,
    default_priority: Priority,
) -> Vec<Resolved<L>> {
    subscriber
        .subscribed_events()
        .into_iter()
        .flat_map(|sub| {
            let event = sub.event;
            sub.handlers.into_iter().map(move |handler| Resolved {
                event: event.clone(),
                listener: handler.listener,
                priority: handler.priority.unwrap_or(default_priority),
            })
        })
        .collect()
}
