use crate::types::{EventName, Priority};

/// Error type returned by listeners. Any boxed error is accepted.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// A single listener failure recorded while dispatching with
/// [`ErrorPolicy::ContinueOnError`](crate::config::ErrorPolicy::ContinueOnError).
#[derive(Debug, thiserror::Error)]
#[error("listener #{position} (priority {priority}) failed: {source}")]
pub struct ListenerFailure {
    /// Zero-based position of the listener in the dispatch order.
    pub position: usize,
    /// Priority the listener was registered with.
    pub priority: Priority,
    /// The error the listener returned.
    #[source]
    pub source: ListenerError,
}

/// Errors produced by listener registration and dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A write operation was attempted through a read-only dispatcher.
    #[error("illegal mutation: {operation} is not allowed on an immutable dispatcher")]
    IllegalMutation { operation: &'static str },

    /// A listener failed and the remaining listeners were skipped.
    #[error("listener #{position} (priority {priority}) for '{event}' failed: {source}")]
    ListenerFailed {
        event: EventName,
        position: usize,
        priority: Priority,
        #[source]
        source: ListenerError,
    },

    /// One or more listeners failed; every listener was still invoked.
    #[error("{} listener(s) failed while dispatching '{event}'", failures.len())]
    ListenersFailed {
        event: EventName,
        failures: Vec<ListenerFailure>,
    },
}

impl DispatchError {
    pub(crate) fn illegal(operation: &'static str) -> Self {
        Self::IllegalMutation { operation }
    }

    /// Returns `true` if this error was raised by a read-only dispatcher.
    pub fn is_illegal_mutation(&self) -> bool {
        matches!(self, Self::IllegalMutation { .. })
    }

    /// Returns `true` if this error reports listener failures.
    pub fn is_listener_failure(&self) -> bool {
        matches!(
            self,
            Self::ListenerFailed { .. } | Self::ListenersFailed { .. }
        )
    }
}

/// Convenience alias used throughout the dispatch crate.
pub type DispatchResult<T> = Result<T, DispatchError>;
