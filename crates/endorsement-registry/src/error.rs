//! Registry error types
//!
//! Every error is a precondition rejection: the operation had no effect and
//! emitted no notification. None of them are transient.

use crate::identifiers::{Identity, IdentityParseError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from endorsement registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndorsementError {
    /// Caller lacks the controller capability.
    #[error("{caller} is not the registry controller")]
    Unauthorized {
        /// The rejected caller
        caller: Identity,
    },

    /// A request was issued for an identity that already endorsed.
    #[error("{identity} has already endorsed")]
    AlreadyEndorsed {
        /// The identity in question
        identity: Identity,
    },

    /// A request was issued for an identity with a pending request.
    #[error("endorsement already requested from {identity}")]
    AlreadyRequested {
        /// The identity in question
        identity: Identity,
    },

    /// The caller tried to endorse without a pending request.
    #[error("no endorsement requested from {identity}")]
    EndorsementNotRequested {
        /// The identity in question
        identity: Identity,
    },

    /// The caller tried to revoke without a current endorsement.
    #[error("{identity} has not endorsed")]
    NotEndorsed {
        /// The identity in question
        identity: Identity,
    },

    /// The controller tried to remove an identity that is neither endorsed
    /// nor requested.
    #[error("{identity} is neither endorsed nor requested")]
    NotEndorsedOrRequested {
        /// The identity in question
        identity: Identity,
    },
}

impl EndorsementError {
    /// Create an unauthorized error.
    pub fn unauthorized(caller: Identity) -> Self {
        Self::Unauthorized { caller }
    }

    /// Whether this is a capability failure rather than a state precondition
    /// failure.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Identity the error refers to (the caller, for authorization failures).
    pub fn identity(&self) -> Identity {
        match self {
            Self::Unauthorized { caller } => *caller,
            Self::AlreadyEndorsed { identity }
            | Self::AlreadyRequested { identity }
            | Self::EndorsementNotRequested { identity }
            | Self::NotEndorsed { identity }
            | Self::NotEndorsedOrRequested { identity } => *identity,
        }
    }
}

/// Errors from loading registry configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for `RegistryConfig`
    #[error("invalid registry config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An identity override does not parse
    #[error("invalid identity in {field}: {source}")]
    InvalidIdentity {
        /// Config field or environment variable being set
        field: String,
        /// Parse failure
        #[source]
        source: IdentityParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let identity = Identity::from_seed(7);

        let err = EndorsementError::unauthorized(identity);
        assert!(err.to_string().contains("not the registry controller"));
        assert!(err.to_string().contains(&identity.to_string()));
        assert!(err.is_authorization());

        let err = EndorsementError::NotEndorsedOrRequested { identity };
        assert!(err.to_string().contains("neither endorsed nor requested"));
        assert!(!err.is_authorization());
        assert_eq!(err.identity(), identity);
    }
}
