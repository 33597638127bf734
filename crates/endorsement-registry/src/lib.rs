//! Endorsement Registry
//!
//! A single-controller registry that asks parties to endorse it and tracks
//! their answers. Each tracked identity holds exactly one
//! [`EndorsementState`]:
//!
//! - The controller requests an endorsement from an identity
//! - The identity endorses, and may later revoke
//! - The controller may remove an endorsement or a pending request
//!
//! Every accepted transition emits an [`EndorsementEvent`]; comments exist
//! only in those notifications and are never stored.
//!
//! # Example
//!
//! ```
//! use endorsement_registry::{
//!     EndorsementRegistry, EndorsementState, Identity, RecordingSink, RegistryConfig,
//! };
//!
//! let controller = Identity::from_seed(1);
//! let alice = Identity::from_seed(2);
//!
//! let mut registry = EndorsementRegistry::create(controller, RegistryConfig::default());
//! let sink = RecordingSink::new();
//! registry.subscribe(sink.clone());
//!
//! registry.request_endorsement(controller, alice, Some("audit note"))?;
//! registry.endorse(alice, None)?;
//!
//! assert_eq!(registry.endorsement_status(&alice), EndorsementState::Endorsed);
//! assert_eq!(sink.len(), 2);
//! # Ok::<(), endorsement_registry::EndorsementError>(())
//! ```

pub mod access;
pub mod config;
pub mod error;
pub mod events;
pub mod identifiers;
pub mod registry;
pub mod shared;
pub mod state;

// Re-export primary types
pub use access::{AccessController, SingleController};
pub use config::RegistryConfig;
pub use error::{ConfigError, EndorsementError};
pub use events::{EndorsementEvent, NotificationSink, RecordingSink, TracingSink};
pub use identifiers::{Identity, IdentityParseError, IDENTITY_LEN};
pub use registry::EndorsementRegistry;
pub use shared::SharedRegistry;
pub use state::EndorsementState;

