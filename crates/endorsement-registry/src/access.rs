//! Controller capability
//!
//! Registries do not own their access policy. They hold something that can
//! answer "is this caller the controller?" and defer to it for every
//! controller-only operation.

use crate::error::EndorsementError;
use crate::identifiers::Identity;
use parking_lot::RwLock;
use std::sync::Arc;

/// Capability check consulted by controller-only operations.
pub trait AccessController: Send + Sync {
    /// Identity currently holding control
    fn current_controller(&self) -> Identity;

    /// Whether `caller` holds control
    fn is_controller(&self, caller: &Identity) -> bool {
        self.current_controller() == *caller
    }
}

impl<T: AccessController + ?Sized> AccessController for Arc<T> {
    fn current_controller(&self) -> Identity {
        (**self).current_controller()
    }

    fn is_controller(&self, caller: &Identity) -> bool {
        (**self).is_controller(caller)
    }
}

/// Single-owner controller whose authority can be handed over.
#[derive(Debug)]
pub struct SingleController {
    controller: RwLock<Identity>,
}

impl SingleController {
    /// Create a controller held by `controller`
    pub fn new(controller: Identity) -> Self {
        Self {
            controller: RwLock::new(controller),
        }
    }

    /// Hand control to `new_controller`. Only the current controller may do
    /// this.
    pub fn transfer_control(
        &self,
        caller: Identity,
        new_controller: Identity,
    ) -> Result<(), EndorsementError> {
        let mut controller = self.controller.write();
        if *controller != caller {
            return Err(EndorsementError::unauthorized(caller));
        }
        tracing::info!(from = %caller, to = %new_controller, "controller transferred");
        *controller = new_controller;
        Ok(())
    }
}

impl AccessController for SingleController {
    fn current_controller(&self) -> Identity {
        *self.controller.read()
    }
}
