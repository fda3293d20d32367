use serde::{Deserialize, Serialize};

/// What a dispatch does when a listener returns an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop at the first failing listener and return its error.
    #[default]
    FailFast,
    /// Keep invoking the remaining listeners, then report every failure.
    ContinueOnError,
}

/// Configuration for an [`EventRegistry`](crate::registry::EventRegistry).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Listener failure handling during dispatch.
    pub error_policy: ErrorPolicy,
}

impl DispatcherConfig {
    /// Run every listener even when some of them fail.
    pub fn continue_on_error() -> Self {
        Self {
            error_policy: ErrorPolicy::ContinueOnError,
        }
    }
}
