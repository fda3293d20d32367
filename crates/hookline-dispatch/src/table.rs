//! Priority-ordered listener table.
//!
//! Pure ordering logic: no locking, no invocation. Both the sync and async
//! registries keep one of these behind a lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::listener::same_listener;
use crate::types::{EventName, Priority};

/// A single registration: a listener handle and the priority it was added at.
pub struct ListenerEntry<L: ?Sized> {
    pub listener: Arc<L>,
    pub priority: Priority,
}

impl<L: ?Sized> Clone for ListenerEntry<L> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
            priority: self.priority,
        }
    }
}

/// Map from event name to its entries.
///
/// Invariant: each sequence is sorted by descending priority and entries of
/// equal priority keep registration order. Empty sequences are never stored.
pub struct ListenerTable<L: ?Sized> {
    events: BTreeMap<EventName, Vec<ListenerEntry<L>>>,
}

impl<L: ?Sized> ListenerTable<L> {
    pub fn new() -> Self {
        Self {
            events: BTreeMap::new(),
        }
    }

    /// Insert after every entry whose priority is `>= priority`.
    pub fn insert(&mut self, event: EventName, listener: Arc<L>, priority: Priority) {
        let entries = self.events.entry(event).or_default();
        let at = entries.partition_point(|e| e.priority >= priority);
        entries.insert(at, ListenerEntry { listener, priority });
    }

    /// Remove every entry for `listener` under `event`. Returns how many
    /// entries were dropped.
    pub fn remove(&mut self, event: &str, listener: &Arc<L>) -> usize {
        let Some(entries) = self.events.get_mut(event) else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|e| !same_listener(&e.listener, listener));
        let removed = before - entries.len();
        if entries.is_empty() {
            self.events.remove(event);
        }
        removed
    }

    /// Entries for `event` in dispatch order.
    pub fn entries(&self, event: &str) -> &[ListenerEntry<L>] {
        self.events.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Point-in-time copy of the entries for `event`.
    pub fn snapshot(&self, event: &str) -> Vec<ListenerEntry<L>> {
        self.entries(event).to_vec()
    }

    /// Listener handles for `event` in dispatch order.
    pub fn listeners(&self, event: &str) -> Vec<Arc<L>> {
        self.entries(event)
            .iter()
            .map(|e| Arc::clone(&e.listener))
            .collect()
    }

    /// Every event with at least one listener, mapped to its handles.
    pub fn all_listeners(&self) -> BTreeMap<EventName, Vec<Arc<L>>> {
        self.events
            .iter()
            .map(|(name, entries)| {
                let handles = entries.iter().map(|e| Arc::clone(&e.listener)).collect();
                (name.clone(), handles)
            })
            .collect()
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.events.get(event).is_some_and(|e| !e.is_empty())
    }

    pub fn has_any_listeners(&self) -> bool {
        self.events.values().any(|e| !e.is_empty())
    }

    /// Priority of the first entry matching `listener` under `event`.
    pub fn priority_of(&self, event: &str, listener: &Arc<L>) -> Option<Priority> {
        self.entries(event)
            .iter()
            .find(|e| same_listener(&e.listener, listener))
            .map(|e| e.priority)
    }

    /// Number of entries across all events.
    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<L: ?Sized> Default for ListenerTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Helper: a listener tagged with a label for readable assertions.
    fn tagged(label: &'static str) -> Arc<&'static str> {
        Arc::new(label)
    }

    fn labels(table: &ListenerTable<&'static str>, event: &str) -> Vec<&'static str> {
        table.listeners(event).iter().map(|l| **l).collect()
    }

    #[test]
    fn higher_priority_first_ties_in_registration_order() {
        let mut table = ListenerTable::new();
        table.insert("save".into(), tagged("f1"), 10);
        table.insert("save".into(), tagged("f2"), 20);
        table.insert("save".into(), tagged("f3"), 10);
        assert_eq!(labels(&table, "save"), vec!["f2", "f1", "f3"]);
    }

    #[test]
    fn negative_and_extreme_priorities() {
        let mut table = ListenerTable::new();
        table.insert("e".into(), tagged("low"), Priority::MIN);
        table.insert("e".into(), tagged("zero"), 0);
        table.insert("e".into(), tagged("neg"), -1);
        table.insert("e".into(), tagged("high"), Priority::MAX);
        assert_eq!(labels(&table, "e"), vec!["high", "zero", "neg", "low"]);
    }

    #[test]
    fn duplicate_registrations_are_kept() {
        let mut table = ListenerTable::new();
        let l = tagged("l");
        table.insert("e".into(), Arc::clone(&l), 1);
        table.insert("e".into(), Arc::clone(&l), 5);
        assert_eq!(table.entries("e").len(), 2);
        assert_eq!(table.priority_of("e", &l), Some(5));
    }

    #[test]
    fn remove_drops_every_matching_entry() {
        let mut table = ListenerTable::new();
        let l = tagged("l");
        let other = tagged("other");
        table.insert("e".into(), Arc::clone(&l), 1);
        table.insert("e".into(), Arc::clone(&other), 3);
        table.insert("e".into(), Arc::clone(&l), 5);

        assert_eq!(table.remove("e", &l), 2);
        assert_eq!(labels(&table, "e"), vec!["other"]);
        assert_eq!(table.remove("e", &l), 0);
        assert_eq!(table.remove("unknown", &l), 0);
    }

    #[test]
    fn removing_last_entry_forgets_event() {
        let mut table = ListenerTable::new();
        let l = tagged("l");
        table.insert("e".into(), Arc::clone(&l), 0);
        table.remove("e", &l);
        assert!(!table.has_listeners("e"));
        assert!(!table.has_any_listeners());
        assert!(table.all_listeners().is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_inserts() {
        let mut table = ListenerTable::new();
        table.insert("e".into(), tagged("a"), 0);
        let snap = table.snapshot("e");
        table.insert("e".into(), tagged("b"), 10);
        assert_eq!(snap.len(), 1);
        assert_eq!(table.entries("e").len(), 2);
    }

    #[test]
    fn unknown_event_is_empty() {
        let table: ListenerTable<&'static str> = ListenerTable::new();
        assert!(table.listeners("nope").is_empty());
        assert!(!table.has_listeners("nope"));
        assert_eq!(table.len(), 0);
    }

    proptest! {
        #[test]
        fn ordering_invariant_holds(
            priorities in prop::collection::vec(-50i64..50, 0..40),
            removals in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        ) {
            let mut table = ListenerTable::new();
            let handles: Vec<Arc<usize>> = (0..priorities.len()).map(Arc::new).collect();
            for (handle, p) in handles.iter().zip(&priorities) {
                table.insert("e".into(), Arc::clone(handle), *p);
            }
            if !handles.is_empty() {
                for idx in &removals {
                    table.remove("e", &handles[idx.index(handles.len())]);
                }
            }

            let entries = table.entries("e");
            for pair in entries.windows(2) {
                prop_assert!(pair[0].priority >= pair[1].priority);
                if pair[0].priority == pair[1].priority {
                    // Handles carry their registration index.
                    prop_assert!(*pair[0].listener < *pair[1].listener);
                }
            }
        }
    }
}
