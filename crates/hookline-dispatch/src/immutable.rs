//! Read-only view over a dispatcher.
//!
//! [`ImmutableEventDispatcher`] borrows one dispatcher for its whole
//! lifetime. Queries and dispatch are forwarded unchanged; every write
//! operation fails with [`DispatchError::IllegalMutation`] without touching
//! the wrapped dispatcher. The borrow is never handed back out, so nothing
//! reachable through the view can change listener state.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{DispatchError, DispatchResult};
use crate::event::Event;
use crate::subscriber::EventSubscriber;
use crate::traits::{
    AsyncEventDispatcher, EventDispatcher, ListenerRegistry, MutableListenerRegistry,
};
use crate::types::{EventName, EventNames, Priority};

/// A dispatcher that can be used but not reconfigured.
pub struct ImmutableEventDispatcher<'a, D: ?Sized> {
    inner: &'a D,
}

impl<'a, D: ?Sized> ImmutableEventDispatcher<'a, D> {
    /// Wrap `inner`. The binding is fixed for the life of the view.
    pub fn new(inner: &'a D) -> Self {
        Self { inner }
    }

    fn reject(&self, operation: &'static str) -> DispatchError {
        warn!(operation, "mutation attempted on immutable dispatcher");
        DispatchError::illegal(operation)
    }
}

impl<D: ?Sized> Clone for ImmutableEventDispatcher<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for ImmutableEventDispatcher<'_, D> {}

impl<D: ?Sized> fmt::Debug for ImmutableEventDispatcher<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImmutableEventDispatcher").finish_non_exhaustive()
    }
}

impl<L, D> ListenerRegistry<L> for ImmutableEventDispatcher<'_, D>
where
    L: ?Sized,
    D: ListenerRegistry<L> + ?Sized,
{
    fn listeners(&self, event: &str) -> Vec<Arc<L>> {
        self.inner.listeners(event)
    }

    fn all_listeners(&self) -> BTreeMap<EventName, Vec<Arc<L>>> {
        self.inner.all_listeners()
    }

    fn has_listeners(&self, event: Option<&str>) -> bool {
        self.inner.has_listeners(event)
    }

    fn listener_priority(&self, event: &str, listener: &Arc<L>) -> Option<Priority> {
        self.inner.listener_priority(event, listener)
    }
}

impl<L, D> MutableListenerRegistry<L> for ImmutableEventDispatcher<'_, D>
where
    L: ?Sized,
    D: ListenerRegistry<L> + ?Sized,
{
    fn add_listener(
        &self,
        _events: EventNames,
        _listener: Arc<L>,
        _priority: Priority,
    ) -> DispatchResult<()> {
        Err(self.reject("add_listener"))
    }

    fn add_subscriber(
        &self,
        _subscriber: &dyn EventSubscriber<L>,
        _priority: Priority,
    ) -> DispatchResult<()> {
        Err(self.reject("add_subscriber"))
    }

    fn remove_listener(&self, _events: EventNames, _listener: &Arc<L>) -> DispatchResult<()> {
        Err(self.reject("remove_listener"))
    }

    fn remove_subscriber(&self, _subscriber: &dyn EventSubscriber<L>) -> DispatchResult<()> {
        Err(self.reject("remove_subscriber"))
    }
}

impl<E, D> EventDispatcher<E> for ImmutableEventDispatcher<'_, D>
where
    E: Event,
    D: EventDispatcher<E> + ?Sized,
{
    fn dispatch<'e>(&self, event: &'e mut E, event_name: &str) -> DispatchResult<&'e mut E> {
        self.inner.dispatch(event, event_name)
    }
}

#[async_trait]
impl<'a, E, D> AsyncEventDispatcher<E> for ImmutableEventDispatcher<'a, D>
where
    E: Event,
    D: AsyncEventDispatcher<E> + ?Sized,
{
    async fn dispatch<'e>(
        &self,
        event: &'e mut E,
        event_name: &str,
    ) -> DispatchResult<&'e mut E> {
        self.inner.dispatch(event, event_name).await
    }
}
