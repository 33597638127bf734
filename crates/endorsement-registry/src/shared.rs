//! Thread-safe registry handle
//!
//! Wraps a registry in one coarse mutex. Each call holds the lock for exactly
//! one operation, so every transition stays atomic when several threads
//! drive the same registry.
//!
//! Sinks subscribed through the handle are notified after the lock is
//! released, so they may read back from the same registry. Sinks added to
//! the inner registry through [`SharedRegistry::with`] run under the lock.

use crate::access::{AccessController, SingleController};
use crate::config::RegistryConfig;
use crate::error::EndorsementError;
use crate::events::{EndorsementEvent, NotificationSink};
use crate::identifiers::Identity;
use crate::registry::EndorsementRegistry;
use crate::state::EndorsementState;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

type SinkList = Arc<RwLock<Vec<Arc<dyn NotificationSink>>>>;

/// Cloneable handle to a registry guarded by a single lock.
pub struct SharedRegistry<A: AccessController = SingleController> {
    inner: Arc<Mutex<EndorsementRegistry<A>>>,
    /// Observers notified outside the registry lock
    sinks: SinkList,
}

impl<A: AccessController> Clone for SharedRegistry<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            sinks: Arc::clone(&self.sinks),
        }
    }
}

impl<A: AccessController> fmt::Debug for SharedRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("inner", &*self.inner.lock())
            .field("sinks", &self.sinks.read().len())
            .finish()
    }
}

impl SharedRegistry<SingleController> {
    /// Create a shared registry owned by a [`SingleController`]
    pub fn create(creator: Identity, config: RegistryConfig) -> Self {
        Self::new(EndorsementRegistry::create(creator, config))
    }
}

impl<A: AccessController> SharedRegistry<A> {
    /// Take ownership of `registry`
    pub fn new(registry: EndorsementRegistry<A>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
            sinks: Arc::default(),
        }
    }

    /// Run `f` with exclusive access to the registry
    pub fn with<R>(&self, f: impl FnOnce(&mut EndorsementRegistry<A>) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// See [`EndorsementRegistry::request_endorsement`]
    pub fn request_endorsement(
        &self,
        caller: Identity,
        identity: Identity,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        let result = self
            .inner
            .lock()
            .request_endorsement(caller, identity, comment);
        self.dispatch(result)
    }

    /// See [`EndorsementRegistry::endorse`]
    pub fn endorse(
        &self,
        caller: Identity,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        let result = self.inner.lock().endorse(caller, comment);
        self.dispatch(result)
    }

    /// See [`EndorsementRegistry::revoke_endorsement`]
    pub fn revoke_endorsement(
        &self,
        caller: Identity,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        let result = self.inner.lock().revoke_endorsement(caller, comment);
        self.dispatch(result)
    }

    /// See [`EndorsementRegistry::remove_endorsement`]
    pub fn remove_endorsement(
        &self,
        caller: Identity,
        identity: Identity,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        let result = self
            .inner
            .lock()
            .remove_endorsement(caller, identity, comment);
        self.dispatch(result)
    }

    /// See [`EndorsementRegistry::endorse_on`].
    ///
    /// Locks are taken in address order so two registries delegating to each
    /// other concurrently cannot deadlock. A registry delegating to itself is
    /// handled under its single lock.
    pub fn endorse_on<B: AccessController>(
        &self,
        caller: Identity,
        other: &SharedRegistry<B>,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        let this_addr = Arc::as_ptr(&self.inner).cast::<()>();
        let other_addr = Arc::as_ptr(&other.inner).cast::<()>();

        let result = if this_addr == other_addr {
            let mut registry = self.inner.lock();
            match registry.ensure_controller(caller) {
                Ok(()) => {
                    let registry_id = registry.registry_id();
                    registry.endorse(registry_id, comment)
                }
                Err(error) => Err(error),
            }
        } else if this_addr < other_addr {
            let this = self.inner.lock();
            let mut target = other.inner.lock();
            this.endorse_on(caller, &mut *target, comment)
        } else {
            let mut target = other.inner.lock();
            let this = self.inner.lock();
            this.endorse_on(caller, &mut *target, comment)
        };

        // The target registry emitted the notification
        other.dispatch(result)
    }

    /// See [`EndorsementRegistry::endorsement_status`]
    pub fn endorsement_status(&self, identity: &Identity) -> EndorsementState {
        self.inner.lock().endorsement_status(identity)
    }

    /// See [`EndorsementRegistry::snapshot`]
    pub fn snapshot(&self) -> Vec<(Identity, EndorsementState)> {
        self.inner.lock().snapshot()
    }

    /// See [`EndorsementRegistry::registry_id`]
    pub fn registry_id(&self) -> Identity {
        self.inner.lock().registry_id()
    }

    /// See [`EndorsementRegistry::controller`]
    pub fn controller(&self) -> Identity {
        self.inner.lock().controller()
    }

    /// Register an observer notified after each accepted operation, once
    /// the registry lock has been released.
    pub fn subscribe<S: NotificationSink + 'static>(&self, sink: S) {
        self.sinks.write().push(Arc::new(sink));
    }

    fn dispatch(
        &self,
        result: Result<EndorsementEvent, EndorsementError>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        if let Ok(event) = &result {
            // Copy the list so a sink may subscribe without deadlocking
            let sinks = self.sinks.read().clone();
            for sink in &sinks {
                sink.notify(event);
            }
        }
        result
    }
}
