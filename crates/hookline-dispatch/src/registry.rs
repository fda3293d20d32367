//! The mutable listener registry and its dispatch loops.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::{DispatcherConfig, ErrorPolicy};
use crate::error::{DispatchError, DispatchResult, ListenerError, ListenerFailure};
use crate::event::Event;
use crate::immutable::ImmutableEventDispatcher;
use crate::listener::{AsyncListener, Listener};
use crate::subscriber::{resolve, EventSubscriber};
use crate::table::ListenerTable;
use crate::traits::{
    AsyncEventDispatcher, EventDispatcher, ListenerRegistry, MutableListenerRegistry,
};
use crate::types::{EventName, EventNames, Priority};

/// Registry of prioritized listeners, generic over the listener kind.
///
/// All methods take `&self`; the table sits behind an `RwLock`. Dispatch
/// copies the listener handles for the event and releases the lock before
/// any listener runs, so listeners may add or remove listeners (including
/// themselves). Such changes take effect from the next dispatch on.
pub struct EventRegistry<L: ?Sized> {
    table: RwLock<ListenerTable<L>>,
    config: DispatcherConfig,
}

/// Registry of synchronous listeners for events of type `E`.
pub type Dispatcher<E> = EventRegistry<dyn Listener<E>>;

/// Registry of asynchronous listeners for events of type `E`.
pub type AsyncDispatcher<E> = EventRegistry<dyn AsyncListener<E>>;

impl<L: ?Sized> EventRegistry<L> {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create an empty registry with an explicit configuration.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            table: RwLock::new(ListenerTable::new()),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// A read-only view over this registry.
    pub fn freeze(&self) -> ImmutableEventDispatcher<'_, Self> {
        ImmutableEventDispatcher::new(self)
    }

    /// Total number of registrations across all events.
    pub fn listener_count(&self) -> usize {
        self.read().len()
    }

    // Each table call leaves every event's entries sorted and non-empty, so a
    // poisoned lock still guards a valid table. A panic between calls of a
    // multi-event add or remove can leave only part of the names updated.
    fn read(&self) -> RwLockReadGuard<'_, ListenerTable<L>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListenerTable<L>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L: ?Sized> Default for EventRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized + Send + Sync> ListenerRegistry<L> for EventRegistry<L> {
    fn listeners(&self, event: &str) -> Vec<Arc<L>> {
        self.read().listeners(event)
    }

    fn all_listeners(&self) -> BTreeMap<EventName, Vec<Arc<L>>> {
        self.read().all_listeners()
    }

    fn has_listeners(&self, event: Option<&str>) -> bool {
        let table = self.read();
        match event {
            Some(name) => table.has_listeners(name),
            None => table.has_any_listeners(),
        }
    }

    fn listener_priority(&self, event: &str, listener: &Arc<L>) -> Option<Priority> {
        self.read().priority_of(event, listener)
    }
}

impl<L: ?Sized + Send + Sync> MutableListenerRegistry<L> for EventRegistry<L> {
    fn add_listener(
        &self,
        events: EventNames,
        listener: Arc<L>,
        priority: Priority,
    ) -> DispatchResult<()> {
        let mut table = self.write();
        for event in events {
            debug!(event = %event, priority, "listener added");
            table.insert(event, Arc::clone(&listener), priority);
        }
        Ok(())
    }

    fn add_subscriber(
        &self,
        subscriber: &dyn EventSubscriber<L>,
        priority: Priority,
    ) -> DispatchResult<()> {
        let resolved = resolve(subscriber, priority);
        debug!(handlers = resolved.len(), priority, "subscriber added");
        for r in resolved {
            self.add_listener(r.event.into(), r.listener, r.priority)?;
        }
        Ok(())
    }

    fn remove_listener(&self, events: EventNames, listener: &Arc<L>) -> DispatchResult<()> {
        let mut table = self.write();
        for event in &events {
            let removed = table.remove(event.as_str(), listener);
            if removed > 0 {
                debug!(event = %event, removed, "listener removed");
            }
        }
        Ok(())
    }

    fn remove_subscriber(&self, subscriber: &dyn EventSubscriber<L>) -> DispatchResult<()> {
        let resolved = resolve(subscriber, Priority::default());
        debug!(handlers = resolved.len(), "subscriber removed");
        for r in resolved {
            self.remove_listener(r.event.into(), &r.listener)?;
        }
        Ok(())
    }
}

impl<E: Event> EventDispatcher<E> for EventRegistry<dyn Listener<E>> {
    fn dispatch<'e>(&self, event: &'e mut E, event_name: &str) -> DispatchResult<&'e mut E> {
        let snapshot = self.read().snapshot(event_name);
        if snapshot.is_empty() {
            return Ok(event);
        }

        let mut run = DispatchRun::new(event_name, self.config.error_policy);
        for (position, entry) in snapshot.iter().enumerate() {
            if event.is_propagation_stopped() {
                run.stopped_at(position);
                break;
            }
            if let Err(source) = entry.listener.handle(event, &run.event) {
                run.record_failure(position, entry.priority, source)?;
            }
            run.invoked += 1;
        }
        run.finish()?;
        Ok(event)
    }
}

#[async_trait]
impl<E: Event> AsyncEventDispatcher<E> for EventRegistry<dyn AsyncListener<E>> {
    async fn dispatch<'e>(
        &self,
        event: &'e mut E,
        event_name: &str,
    ) -> DispatchResult<&'e mut E> {
        let snapshot = self.read().snapshot(event_name);
        if snapshot.is_empty() {
            return Ok(event);
        }

        let mut run = DispatchRun::new(event_name, self.config.error_policy);
        for (position, entry) in snapshot.iter().enumerate() {
            if event.is_propagation_stopped() {
                run.stopped_at(position);
                break;
            }
            let outcome = entry.listener.handle(&mut *event, &run.event).await;
            if let Err(source) = outcome {
                run.record_failure(position, entry.priority, source)?;
            }
            run.invoked += 1;
        }
        run.finish()?;
        Ok(event)
    }
}

/// Bookkeeping for a single dispatch call, shared by the sync and async loops.
struct DispatchRun {
    event: EventName,
    policy: ErrorPolicy,
    invoked: usize,
    failures: Vec<ListenerFailure>,
}

impl DispatchRun {
    fn new(event: &str, policy: ErrorPolicy) -> Self {
        Self {
            event: EventName::from(event),
            policy,
            invoked: 0,
            failures: Vec::new(),
        }
    }

    fn stopped_at(&self, position: usize) {
        debug!(event = %self.event, position, "propagation stopped");
    }

    /// Fail-fast turns the failure into an error right away; otherwise it is
    /// kept for [`Self::finish`].
    fn record_failure(
        &mut self,
        position: usize,
        priority: Priority,
        source: ListenerError,
    ) -> DispatchResult<()> {
        match self.policy {
            ErrorPolicy::FailFast => Err(DispatchError::ListenerFailed {
                event: self.event.clone(),
                position,
                priority,
                source,
            }),
            ErrorPolicy::ContinueOnError => {
                warn!(event = %self.event, position, priority, error = %source, "listener failed");
                self.failures.push(ListenerFailure {
                    position,
                    priority,
                    source,
                });
                Ok(())
            }
        }
    }

    fn finish(self) -> DispatchResult<()> {
        debug!(
            event = %self.event,
            listeners = self.invoked,
            failed = self.failures.len(),
            "event dispatched"
        );
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::ListenersFailed {
                event: self.event,
                failures: self.failures,
            })
        }
    }
}
