//! The dispatcher capability, split into a read surface and a write surface.
//!
//! Code that must not change listener state should be handed something that
//! only implements [`ListenerRegistry`] plus [`EventDispatcher`] (or
//! [`AsyncEventDispatcher`]). [`MutableListenerRegistry`] adds the write
//! operations; the immutable view implements it with methods that always
//! fail, for callers that are generic over the full surface.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DispatchResult;
use crate::event::Event;
use crate::listener::{AsyncListener, Listener};
use crate::subscriber::EventSubscriber;
use crate::types::{EventName, EventNames, Priority};

/// Read-only queries over registered listeners.
pub trait ListenerRegistry<L: ?Sized>: Send + Sync {
    /// Listeners for `event` in dispatch order. Empty if none are registered.
    fn listeners(&self, event: &str) -> Vec<Arc<L>>;

    /// Every event that has listeners, mapped to its listeners in dispatch
    /// order.
    fn all_listeners(&self) -> BTreeMap<EventName, Vec<Arc<L>>>;

    /// With a name: whether that event has a listener. Without: whether any
    /// event does.
    fn has_listeners(&self, event: Option<&str>) -> bool;

    /// Priority `listener` is registered with for `event`, if it is.
    ///
    /// When the listener was added several times, the priority of the
    /// earliest entry in dispatch order is returned.
    fn listener_priority(&self, event: &str, listener: &Arc<L>) -> Option<Priority>;
}

/// Operations that change which listeners are registered.
pub trait MutableListenerRegistry<L: ?Sized>: ListenerRegistry<L> {
    /// Register `listener` for every name in `events`.
    ///
    /// Registering the same listener twice creates two independent entries.
    fn add_listener(&self, events: EventNames, listener: Arc<L>, priority: Priority)
        -> DispatchResult<()>;

    /// Register every handler the subscriber reports. Handlers without their
    /// own priority use `priority`.
    fn add_subscriber(
        &self,
        subscriber: &dyn EventSubscriber<L>,
        priority: Priority,
    ) -> DispatchResult<()>;

    /// Remove every entry for `listener` under each name in `events`,
    /// whatever its priority. Unknown names and listeners are ignored.
    fn remove_listener(&self, events: EventNames, listener: &Arc<L>) -> DispatchResult<()>;

    /// Remove every handler the subscriber reports.
    fn remove_subscriber(&self, subscriber: &dyn EventSubscriber<L>) -> DispatchResult<()>;
}

/// Synchronous dispatch.
pub trait EventDispatcher<E: Event>: ListenerRegistry<dyn Listener<E>> {
    /// Invoke every listener registered for `event_name`, highest priority
    /// first, and hand back the same event reference.
    fn dispatch<'e>(&self, event: &'e mut E, event_name: &str) -> DispatchResult<&'e mut E>;
}

/// Asynchronous dispatch. Listeners are awaited one at a time, in order.
#[async_trait]
pub trait AsyncEventDispatcher<E: Event>: ListenerRegistry<dyn AsyncListener<E>> {
    /// Invoke every listener registered for `event_name`, highest priority
    /// first, and resolve to the same event reference.
    async fn dispatch<'e>(&self, event: &'e mut E, event_name: &str)
        -> DispatchResult<&'e mut E>;
}
