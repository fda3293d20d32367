//! Priority-ordered, in-process event dispatch.
//!
//! Listeners are registered against named events with a signed priority.
//! Dispatch invokes them highest priority first; listeners of equal priority
//! run in the order they were registered. A registry can be frozen into an
//! [`ImmutableEventDispatcher`], which dispatches normally but rejects every
//! attempt to add or remove listeners.
//!
//! # Quick Start
//!
//! ```rust
//! use hookline_dispatch::{
//!     from_fn, Dispatcher, Event, EventDispatcher, EventName, MutableListenerRegistry,
//! };
//!
//! #[derive(Default)]
//! struct Saved(Vec<&'static str>);
//! impl Event for Saved {}
//!
//! let dispatcher = Dispatcher::<Saved>::new();
//! dispatcher
//!     .add_listener("save".into(), from_fn(|e: &mut Saved, _: &EventName| e.0.push("f1")), 10)
//!     .unwrap();
//! dispatcher
//!     .add_listener("save".into(), from_fn(|e: &mut Saved, _: &EventName| e.0.push("f2")), 20)
//!     .unwrap();
//!
//! let mut event = Saved::default();
//! dispatcher.dispatch(&mut event, "save").unwrap();
//! assert_eq!(event.0, vec!["f2", "f1"]);
//!
//! let frozen = dispatcher.freeze();
//! assert!(frozen
//!     .add_listener("save".into(), from_fn(|_: &mut Saved, _: &EventName| {}), 0)
//!     .is_err());
//! ```
//!
//! # Design Rules
//!
//! 1. Per event, listeners are ordered by descending priority; ties keep
//!    registration order.
//! 2. Dispatch works on a snapshot taken when it starts. Listeners added or
//!    removed during a dispatch only affect later dispatches.
//! 3. Listeners of one dispatch run one after another, async ones included.
//! 4. Unknown event names are never an error.

pub mod config;
pub mod error;
pub mod event;
pub mod immutable;
pub mod listener;
pub mod registry;
pub mod subscriber;
pub mod table;
pub mod traits;
pub mod types;

// Re-exports for convenience.
pub use config::{DispatcherConfig, ErrorPolicy};
pub use error::{DispatchError, DispatchResult, ListenerError, ListenerFailure};
pub use event::Event;
pub use immutable::ImmutableEventDispatcher;
pub use listener::{
    from_fn, into_async, same_listener, try_from_fn, AsyncListener, Listener, SharedAsyncListener,
    SharedListener,
};
pub use registry::{AsyncDispatcher, Dispatcher, EventRegistry};
pub use subscriber::{EventSubscriber, HandlerSpec, Subscription};
pub use table::{ListenerEntry, ListenerTable};
pub use traits::{AsyncEventDispatcher, EventDispatcher, ListenerRegistry, MutableListenerRegistry};
pub use types::{EventName, EventNames, Priority, DEFAULT_PRIORITY};
