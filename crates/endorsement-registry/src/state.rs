//! Endorsement state machine states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Current endorsement state of a tracked identity.
///
/// Identities the registry has never written are `Unassigned`. There is no
/// history: each identity holds exactly one state and writes overwrite it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EndorsementState {
    /// Never requested (or absent from the registry)
    #[default]
    Unassigned,
    /// Controller asked the identity to endorse
    Requested,
    /// Identity accepted the request
    Endorsed,
    /// Identity withdrew its endorsement
    Revoked,
    /// Controller removed the endorsement or the pending request
    Removed,
}

impl EndorsementState {
    /// Whether the controller may issue a new request from this state.
    ///
    /// `Revoked` and `Removed` reset to `Requested` on a fresh request.
    pub fn can_request(&self) -> bool {
        matches!(self, Self::Unassigned | Self::Revoked | Self::Removed)
    }

    /// Whether the identity may endorse from this state.
    pub fn can_endorse(&self) -> bool {
        matches!(self, Self::Requested)
    }

    /// Whether the identity may revoke from this state.
    pub fn can_revoke(&self) -> bool {
        matches!(self, Self::Endorsed)
    }

    /// Whether the controller may remove from this state.
    pub fn can_remove(&self) -> bool {
        matches!(self, Self::Endorsed | Self::Requested)
    }

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Requested => "requested",
            Self::Endorsed => "endorsed",
            Self::Revoked => "revoked",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for EndorsementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
