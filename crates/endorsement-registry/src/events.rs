//! Endorsement notifications
//!
//! A notification is emitted for every accepted transition and is the only
//! place a comment ever appears. Registries never store comments; observers
//! that care about them subscribe a [`NotificationSink`].

use crate::identifiers::Identity;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Schema version for notification serialization
pub const EVENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VersionedEvent {
    schema_version: u32,
    event: EndorsementEvent,
}

/// Notification emitted on a successful state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndorsementEvent {
    /// Controller requested an endorsement
    Requested {
        /// Identity asked to endorse
        identity: Identity,
        /// Free-text note supplied with the request
        comment: Option<String>,
    },
    /// Identity endorsed
    Endorsed {
        /// Identity that endorsed
        identity: Identity,
        /// Free-text note supplied with the endorsement
        comment: Option<String>,
    },
    /// Identity revoked its endorsement
    Revoked {
        /// Identity that revoked
        identity: Identity,
        /// Free-text note supplied with the revocation
        comment: Option<String>,
    },
    /// Controller removed an endorsement or request
    Removed {
        /// Identity whose endorsement was removed
        identity: Identity,
        /// Free-text note supplied with the removal
        comment: Option<String>,
    },
}

impl EndorsementEvent {
    /// Identity affected by the transition
    pub fn identity(&self) -> Identity {
        match self {
            Self::Requested { identity, .. }
            | Self::Endorsed { identity, .. }
            | Self::Revoked { identity, .. }
            | Self::Removed { identity, .. } => *identity,
        }
    }

    /// Comment carried by the notification, if any
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Requested { comment, .. }
            | Self::Endorsed { comment, .. }
            | Self::Revoked { comment, .. }
            | Self::Removed { comment, .. } => comment.as_deref(),
        }
    }

    /// Stable notification name for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Requested { .. } => "endorsement_requested",
            Self::Endorsed { .. } => "endorsed",
            Self::Revoked { .. } => "endorsement_revoked",
            Self::Removed { .. } => "endorsement_removed",
        }
    }

    /// Encode as a versioned binary envelope.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(&VersionedEvent {
            schema_version: EVENT_SCHEMA_VERSION,
            event: self.clone(),
        })
    }

    /// Decode from a versioned binary or JSON envelope, or bare JSON.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if let Ok(versioned) = bincode::deserialize::<VersionedEvent>(bytes) {
            if versioned.schema_version == EVENT_SCHEMA_VERSION {
                return Some(versioned.event);
            }
        }
        if let Ok(versioned) = serde_json::from_slice::<VersionedEvent>(bytes) {
            if versioned.schema_version == EVENT_SCHEMA_VERSION {
                return Some(versioned.event);
            }
        }
        serde_json::from_slice(bytes).ok()
    }
}

/// Observer of registry notifications.
pub trait NotificationSink: Send + Sync {
    /// Called once per successful transition, after the state is written.
    fn notify(&self, event: &EndorsementEvent);
}

/// Sink that keeps every notification in memory.
///
/// Clones share the same buffer, so a test can subscribe one clone and read
/// from another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<EndorsementEvent>>>,
}

impl RecordingSink {
    /// Create an empty recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<EndorsementEvent> {
        self.events.lock().clone()
    }

    /// Number of notifications recorded
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drain recorded notifications
    pub fn take(&self) -> Vec<EndorsementEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: &EndorsementEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Sink that logs every notification through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &EndorsementEvent) {
        tracing::info!(
            kind = event.kind(),
            identity = %event.identity(),
            comment = event.comment().unwrap_or(""),
            "endorsement notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let identity = Identity::from_seed(3);
        let event = EndorsementEvent::Requested {
            identity,
            comment: Some("audit note".to_string()),
        };

        assert_eq!(event.identity(), identity);
        assert_eq!(event.comment(), Some("audit note"));
        assert_eq!(event.kind(), "endorsement_requested");

        let bare = EndorsementEvent::Removed {
            identity,
            comment: None,
        };
        assert_eq!(bare.comment(), None);
    }

    #[test]
    fn test_versioned_envelope_decodes() {
        let event = EndorsementEvent::Endorsed {
            identity: Identity::from_seed(9),
            comment: Some("ok".to_string()),
        };
        let bytes = event.to_bytes().unwrap();
        assert_eq!(EndorsementEvent::from_bytes(&bytes), Some(event.clone()));

        let json = serde_json::to_vec(&event).unwrap();
        assert_eq!(EndorsementEvent::from_bytes(&json), Some(event));
    }

    #[test]
    fn test_recording_sink_shares_buffer() {
        let sink = RecordingSink::new();
        let observer = sink.clone();
        sink.notify(&EndorsementEvent::Revoked {
            identity: Identity::from_seed(1),
            comment: None,
        });

        assert_eq!(observer.len(), 1);
        assert_eq!(observer.take().len(), 1);
        assert!(sink.is_empty());
    }
}
