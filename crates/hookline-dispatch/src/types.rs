use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Signed listener priority. Higher values run earlier.
pub type Priority = i64;

/// Priority used when the caller does not specify one.
pub const DEFAULT_PRIORITY: Priority = 0;

/// Opaque identifier an event is dispatched under.
///
/// Event names are plain strings; the registry never interprets them beyond
/// equality and ordering of map keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventName(String);

impl EventName {
    /// Create an event name from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventName({:?})", self.0)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&EventName> for EventName {
    fn from(name: &EventName) -> Self {
        name.clone()
    }
}

impl PartialEq<str> for EventName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EventName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One or more event names a listener is registered against or removed from.
///
/// Built from a single name or any collection of names, so callers can write
/// `"save".into()` as well as `["save", "delete"].into()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventNames(Vec<EventName>);

impl EventNames {
    /// The names in the order they were given.
    pub fn iter(&self) -> std::slice::Iter<'_, EventName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventNames {
    type Item = &'a EventName;
    type IntoIter = std::slice::Iter<'a, EventName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for EventNames {
    type Item = EventName;
    type IntoIter = std::vec::IntoIter<EventName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<EventName> for EventNames {
    fn from_iter<I: IntoIterator<Item = EventName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<EventName> for EventNames {
    fn from(name: EventName) -> Self {
        Self(vec![name])
    }
}

impl From<&EventName> for EventNames {
    fn from(name: &EventName) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<&str> for EventNames {
    fn from(name: &str) -> Self {
        Self(vec![EventName::from(name)])
    }
}

impl From<String> for EventNames {
    fn from(name: String) -> Self {
        Self(vec![EventName::from(name)])
    }
}

impl<T: Into<EventName>> From<Vec<T>> for EventNames {
    fn from(names: Vec<T>) -> Self {
        names.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<EventName>, const N: usize> From<[T; N]> for EventNames {
    fn from(names: [T; N]) -> Self {
        names.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<EventName> + Clone> From<&[T]> for EventNames {
    fn from(names: &[T]) -> Self {
        names.iter().cloned().map(Into::into).collect()
    }
}
