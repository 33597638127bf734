//! Endorsement registry
//!
//! Tracks one [`EndorsementState`] per identity and moves it through the
//! request → endorse → revoke lifecycle, with removal available to the
//! controller at any point after a request.
//!
//! | From | Operation | Caller | To |
//! |---|---|---|---|
//! | `Unassigned` / `Revoked` / `Removed` | `request_endorsement` | controller | `Requested` |
//! | `Requested` | `endorse` | the identity | `Endorsed` |
//! | `Endorsed` | `revoke_endorsement` | the identity | `Revoked` |
//! | `Endorsed` / `Requested` | `remove_endorsement` | controller | `Removed` |
//!
//! A rejected operation writes nothing and notifies nobody.

use crate::access::{AccessController, SingleController};
use crate::config::RegistryConfig;
use crate::error::EndorsementError;
use crate::events::{EndorsementEvent, NotificationSink};
use crate::identifiers::Identity;
use crate::state::EndorsementState;
use std::collections::HashMap;
use std::fmt;

/// Registry of endorsement states keyed by identity.
pub struct EndorsementRegistry<A: AccessController = SingleController> {
    /// Identity this registry acts as when it endorses elsewhere
    registry_id: Identity,
    /// Controller capability
    access: A,
    /// Current state per identity; absent means `Unassigned`
    endorsements: HashMap<Identity, EndorsementState>,
    /// Notification observers, in subscription order
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EndorsementRegistry<SingleController> {
    /// Create a registry owned by a [`SingleController`].
    ///
    /// The controller is `config.controller` when set, otherwise `creator`.
    pub fn create(creator: Identity, config: RegistryConfig) -> Self {
        let controller = config.resolved_controller(creator);
        Self::with_access_controller(config, SingleController::new(controller))
    }

    /// Hand control of this registry to `new_controller`.
    pub fn transfer_control(
        &self,
        caller: Identity,
        new_controller: Identity,
    ) -> Result<(), EndorsementError> {
        self.access.transfer_control(caller, new_controller)
    }
}

impl<A: AccessController> EndorsementRegistry<A> {
    /// Create a registry that defers controller checks to `access`.
    ///
    /// Seeded identities go straight to `Requested` without notifications;
    /// duplicates in the seed list are harmless.
    pub fn with_access_controller(config: RegistryConfig, access: A) -> Self {
        let endorsements: HashMap<_, _> = config
            .initial_requests
            .iter()
            .map(|identity| (*identity, EndorsementState::Requested))
            .collect();

        tracing::info!(
            registry = %config.registry_id,
            controller = %access.current_controller(),
            seeded = endorsements.len(),
            "endorsement registry created"
        );

        Self {
            registry_id: config.registry_id,
            access,
            endorsements,
            sinks: Vec::new(),
        }
    }

    /// Identity of this registry
    pub fn registry_id(&self) -> Identity {
        self.registry_id
    }

    /// Identity currently holding control
    pub fn controller(&self) -> Identity {
        self.access.current_controller()
    }

    /// The injected controller capability
    pub fn access_controller(&self) -> &A {
        &self.access
    }

    /// Register an observer for every future notification.
    pub fn subscribe<S: NotificationSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    // =========================================================================
    // Controller operations
    // =========================================================================

    /// Ask `identity` to endorse this registry.
    ///
    /// Resets `Revoked` and `Removed` identities back to `Requested`.
    pub fn request_endorsement(
        &mut self,
        caller: Identity,
        identity: Identity,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        self.ensure_controller(caller)?;

        let current = self.endorsement_status(&identity);
        if !current.can_request() {
            return reject(if current == EndorsementState::Endorsed {
                EndorsementError::AlreadyEndorsed { identity }
            } else {
                EndorsementError::AlreadyRequested { identity }
            });
        }

        let event = EndorsementEvent::Requested {
            identity,
            comment: comment.map(str::to_owned),
        };
        Ok(self.transition(identity, EndorsementState::Requested, event))
    }

    /// Remove an existing endorsement or a pending request.
    pub fn remove_endorsement(
        &mut self,
        caller: Identity,
        identity: Identity,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        self.ensure_controller(caller)?;

        if !self.endorsement_status(&identity).can_remove() {
            return reject(EndorsementError::NotEndorsedOrRequested { identity });
        }

        let event = EndorsementEvent::Removed {
            identity,
            comment: comment.map(str::to_owned),
        };
        Ok(self.transition(identity, EndorsementState::Removed, event))
    }

    /// Have this registry, acting as its own identity, endorse `other`.
    ///
    /// Only this registry's controller may trigger it. `other` applies its
    /// usual rules to the call, so it fails with `EndorsementNotRequested`
    /// unless `other` has requested an endorsement from this registry.
    ///
    /// A registry cannot be passed as its own `other` here; use
    /// [`SharedRegistry::endorse_on`](crate::SharedRegistry::endorse_on) for
    /// self-delegation.
    pub fn endorse_on<B: AccessController>(
        &self,
        caller: Identity,
        other: &mut EndorsementRegistry<B>,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        self.ensure_controller(caller)?;

        tracing::info!(
            registry = %self.registry_id,
            target = %other.registry_id(),
            "delegated endorsement"
        );
        other.endorse(self.registry_id, comment)
    }

    // =========================================================================
    // Self-referential operations
    // =========================================================================

    /// Accept a pending request. The caller is the endorsing identity.
    pub fn endorse(
        &mut self,
        caller: Identity,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        if !self.endorsement_status(&caller).can_endorse() {
            return reject(EndorsementError::EndorsementNotRequested { identity: caller });
        }

        let event = EndorsementEvent::Endorsed {
            identity: caller,
            comment: comment.map(str::to_owned),
        };
        Ok(self.transition(caller, EndorsementState::Endorsed, event))
    }

    /// Withdraw an endorsement. The caller is the endorsing identity.
    pub fn revoke_endorsement(
        &mut self,
        caller: Identity,
        comment: Option<&str>,
    ) -> Result<EndorsementEvent, EndorsementError> {
        if !self.endorsement_status(&caller).can_revoke() {
            return reject(EndorsementError::NotEndorsed { identity: caller });
        }

        let event = EndorsementEvent::Revoked {
            identity: caller,
            comment: comment.map(str::to_owned),
        };
        Ok(self.transition(caller, EndorsementState::Revoked, event))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current state of `identity`; `Unassigned` if never written.
    pub fn endorsement_status(&self, identity: &Identity) -> EndorsementState {
        self.endorsements
            .get(identity)
            .copied()
            .unwrap_or_default()
    }

    /// Number of identities that have ever been written
    pub fn tracked_len(&self) -> usize {
        self.endorsements.len()
    }

    /// Every written identity with its state, sorted by identity.
    pub fn snapshot(&self) -> Vec<(Identity, EndorsementState)> {
        let mut entries: Vec<_> = self
            .endorsements
            .iter()
            .map(|(identity, state)| (*identity, *state))
            .collect();
        entries.sort_by_key(|(identity, _)| *identity);
        entries
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn ensure_controller(&self, caller: Identity) -> Result<(), EndorsementError> {
        if self.access.is_controller(&caller) {
            Ok(())
        } else {
            reject(EndorsementError::unauthorized(caller))
        }
    }

    fn transition(
        &mut self,
        identity: Identity,
        to: EndorsementState,
        event: EndorsementEvent,
    ) -> EndorsementEvent {
        let from = self.endorsements.insert(identity, to).unwrap_or_default();
        tracing::debug!(%identity, %from, %to, "endorsement state changed");

        for sink in &self.sinks {
            sink.notify(&event);
        }
        event
    }
}

fn reject<T>(error: EndorsementError) -> Result<T, EndorsementError> {
    tracing::debug!(%error, "endorsement operation rejected");
    Err(error)
}

impl<A: AccessController> fmt::Debug for EndorsementRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndorsementRegistry")
            .field("registry_id", &self.registry_id)
            .field("controller", &self.access.current_controller())
            .field("tracked", &self.endorsements.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;

    fn identity(seed: u8) -> Identity {
        Identity::from_seed(seed)
    }

    fn registry() -> EndorsementRegistry {
        EndorsementRegistry::create(identity(1), RegistryConfig::default())
    }

    #[test]
    fn test_controller_defaults_to_creator() {
        let registry = registry();
        assert_eq!(registry.controller(), identity(1));

        let configured = EndorsementRegistry::create(
            identity(1),
            RegistryConfig::default().with_controller(identity(2)),
        );
        assert_eq!(configured.controller(), identity(2));
    }

    #[test]
    fn test_request_checks_authorization_before_state() {
        let mut registry = EndorsementRegistry::create(
            identity(1),
            RegistryConfig::default().with_initial_requests([identity(3)]),
        );

        // Non-controller sees Unauthorized even though the state would also reject
        let result = registry.request_endorsement(identity(2), identity(3), None);
        assert_eq!(result, Err(EndorsementError::unauthorized(identity(2))));
    }

    #[test]
    fn test_request_rejections() {
        let mut registry = registry();
        let target = identity(4);

        registry.request_endorsement(identity(1), target, None).unwrap();
        assert_eq!(
            registry.request_endorsement(identity(1), target, None),
            Err(EndorsementError::AlreadyRequested { identity: target })
        );

        registry.endorse(target, None).unwrap();
        assert_eq!(
            registry.request_endorsement(identity(1), target, None),
            Err(EndorsementError::AlreadyEndorsed { identity: target })
        );
    }

    #[test]
    fn test_remove_requires_endorsed_or_requested() {
        let mut registry = registry();
        let target = identity(5);

        assert_eq!(
            registry.remove_endorsement(identity(1), target, None),
            Err(EndorsementError::NotEndorsedOrRequested { identity: target })
        );

        registry.request_endorsement(identity(1), target, None).unwrap();
        registry.remove_endorsement(identity(1), target, None).unwrap();
        assert_eq!(registry.endorsement_status(&target), EndorsementState::Removed);

        // Removing twice is rejected
        assert!(registry.remove_endorsement(identity(1), target, None).is_err());
    }

    #[test]
    fn test_revoke_requires_endorsed() {
        let mut registry = registry();
        let target = identity(6);

        assert_eq!(
            registry.revoke_endorsement(target, None),
            Err(EndorsementError::NotEndorsed { identity: target })
        );

        registry.request_endorsement(identity(1), target, None).unwrap();
        assert!(registry.revoke_endorsement(target, None).is_err());
        assert_eq!(
            registry.endorsement_status(&target),
            EndorsementState::Requested
        );
    }

    #[test]
    fn test_rejected_operations_notify_nobody() {
        let mut registry = registry();
        let sink = RecordingSink::new();
        registry.subscribe(sink.clone());

        let _ = registry.endorse(identity(7), Some("ignored"));
        let _ = registry.request_endorsement(identity(2), identity(7), None);
        assert!(sink.is_empty());
        assert_eq!(registry.tracked_len(), 0);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let mut registry = registry();
        registry.request_endorsement(identity(1), identity(9), None).unwrap();
        registry.request_endorsement(identity(1), identity(3), None).unwrap();

        let snapshot = registry.snapshot();
        assert_eq!(
            snapshot,
            vec![
                (identity(3), EndorsementState::Requested),
                (identity(9), EndorsementState::Requested),
            ]
        );
    }
}
