//! Listener capabilities.
//!
//! A listener is anything that accepts `(event, event name)`. Synchronous
//! listeners implement [`Listener`]; listeners that need to await I/O
//! implement [`AsyncListener`]. Registries store listeners behind `Arc`, and
//! two handles denote the same listener when they share an allocation.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::types::EventName;

/// A synchronous unit of behaviour invoked when an event is dispatched.
pub trait Listener<E>: Send + Sync {
    /// Handle `event`, dispatched under `name`.
    fn handle(&self, event: &mut E, name: &EventName) -> Result<(), ListenerError>;
}

/// A listener that may suspend while handling an event.
///
/// The dispatcher awaits each listener to completion before starting the
/// next one.
#[async_trait]
pub trait AsyncListener<E: Send>: Send + Sync {
    /// Handle `event`, dispatched under `name`.
    async fn handle(&self, event: &mut E, name: &EventName) -> Result<(), ListenerError>;
}

/// Shared handle to a synchronous listener.
pub type SharedListener<E> = Arc<dyn Listener<E>>;

/// Shared handle to an asynchronous listener.
pub type SharedAsyncListener<E> = Arc<dyn AsyncListener<E>>;

/// Returns `true` if both handles point at the same listener.
///
/// Only the data address is compared; trait-object metadata is ignored, so
/// the same allocation seen through different vtables still matches.
pub fn same_listener<L: ?Sized>(a: &Arc<L>, b: &Arc<L>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

// ---------------------------------------------------------------------------
// Closure adapters
// ---------------------------------------------------------------------------

/// Listener backed by an infallible closure. See [`from_fn`].
pub struct FnListener<F> {
    f: F,
}

impl<E, F> Listener<E> for FnListener<F>
where
    F: Fn(&mut E, &EventName) + Send + Sync,
{
    fn handle(&self, event: &mut E, name: &EventName) -> Result<(), ListenerError> {
        (self.f)(event, name);
        Ok(())
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener").finish_non_exhaustive()
    }
}

/// Listener backed by a fallible closure. See [`try_from_fn`].
pub struct TryFnListener<F> {
    f: F,
}

impl<E, F> Listener<E> for TryFnListener<F>
where
    F: Fn(&mut E, &EventName) -> Result<(), ListenerError> + Send + Sync,
{
    fn handle(&self, event: &mut E, name: &EventName) -> Result<(), ListenerError> {
        (self.f)(event, name)
    }
}

impl<F> fmt::Debug for TryFnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryFnListener").finish_non_exhaustive()
    }
}

/// Wrap an infallible closure as a shared listener.
pub fn from_fn<E, F>(f: F) -> SharedListener<E>
where
    E: 'static,
    F: Fn(&mut E, &EventName) + Send + Sync + 'static,
{
    Arc::new(FnListener { f })
}

/// Wrap a fallible closure as a shared listener.
pub fn try_from_fn<E, F>(f: F) -> SharedListener<E>
where
    E: 'static,
    F: Fn(&mut E, &EventName) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    Arc::new(TryFnListener { f })
}

// ---------------------------------------------------------------------------
// Sync -> async bridge
// ---------------------------------------------------------------------------

/// Runs a synchronous listener inside an async dispatcher.
pub struct BlockingListener<E> {
    inner: SharedListener<E>,
    _event: PhantomData<fn(&mut E)>,
}

impl<E> BlockingListener<E> {
    /// The wrapped synchronous listener.
    pub fn inner(&self) -> &SharedListener<E> {
        &self.inner
    }
}

#[async_trait]
impl<E: Send + 'static> AsyncListener<E> for BlockingListener<E> {
    async fn handle(&self, event: &mut E, name: &EventName) -> Result<(), ListenerError> {
        self.inner.handle(event, name)
    }
}

/// Adapt a synchronous listener for registration on an async dispatcher.
///
/// The returned handle is a new allocation: keep it around to remove the
/// listener later, the original sync handle will not match.
pub fn into_async<E: Send + 'static>(listener: SharedListener<E>) -> SharedAsyncListener<E> {
    Arc::new(BlockingListener {
        inner: listener,
        _event: PhantomData,
    })
}
