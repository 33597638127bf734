//! Operation scripts
//!
//! A script is a TOML file with one `[[step]]` table per operation:
//!
//! ```toml
//! [[step]]
//! op = "request"
//! caller = "0xc0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0"
//! identity = "0x0101010101010101010101010101010101010101"
//! comment = "audit note"
//!
//! [[step]]
//! op = "endorse"
//! caller = "0x0101010101010101010101010101010101010101"
//! ```
//!
//! Rejected steps are recorded and the replay continues.

use endorsement_registry::{
    AccessController, EndorsementEvent, EndorsementRegistry, EndorsementState, Identity,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Script file could not be read
    #[error("failed to read script {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Script text is not a valid script
    #[error("invalid script: {0}")]
    Parse(#[from] toml::de::Error),

    /// A step is missing a field its operation needs
    #[error("step {index} ({op}) is missing `{field}`")]
    MissingField {
        /// Zero-based step index
        index: usize,
        /// Operation of the step
        op: StepOp,
        /// Missing field name
        field: &'static str,
    },
}

/// Operation performed by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOp {
    /// Controller requests an endorsement
    Request,
    /// Caller endorses
    Endorse,
    /// Caller revokes
    Revoke,
    /// Controller removes
    Remove,
    /// Read an identity's status
    Status,
}

impl StepOp {
    fn needs_caller(self) -> bool {
        !matches!(self, Self::Status)
    }

    fn needs_identity(self) -> bool {
        matches!(self, Self::Request | Self::Remove | Self::Status)
    }
}

impl std::fmt::Display for StepOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Request => "request",
            Self::Endorse => "endorse",
            Self::Revoke => "revoke",
            Self::Remove => "remove",
            Self::Status => "status",
        };
        f.pad(name)
    }
}

/// One scripted operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Operation to run
    pub op: StepOp,
    /// Identity invoking the operation
    #[serde(default)]
    pub caller: Option<Identity>,
    /// Identity the operation targets (request, remove, status)
    #[serde(default)]
    pub identity: Option<Identity>,
    /// Comment carried into the notification
    #[serde(default)]
    pub comment: Option<String>,
}

/// Ordered list of steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Steps in execution order
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse and validate a script from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ScriptError> {
        let script: Script = toml::from_str(text)?;
        script.validate()?;
        Ok(script)
    }

    /// Load and validate a script file
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every step has the fields its operation needs
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (index, step) in self.steps.iter().enumerate() {
            if step.op.needs_caller() && step.caller.is_none() {
                return Err(ScriptError::MissingField {
                    index,
                    op: step.op,
                    field: "caller",
                });
            }
            if step.op.needs_identity() && step.identity.is_none() {
                return Err(ScriptError::MissingField {
                    index,
                    op: step.op,
                    field: "identity",
                });
            }
        }
        Ok(())
    }
}

/// What happened when a step ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Transition accepted
    Notified {
        /// Emitted notification
        event: EndorsementEvent,
    },
    /// Transition rejected
    Rejected {
        /// Rejection message
        error: String,
    },
    /// Status read
    Status {
        /// Identity read
        identity: Identity,
        /// Its state
        state: EndorsementState,
    },
}

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// Zero-based step index
    pub index: usize,
    /// Operation run
    pub op: StepOp,
    /// Result of running it
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Result of replaying a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Registry identity
    pub registry_id: Identity,
    /// Controller after the replay
    pub controller: Identity,
    /// Per-step outcomes
    pub steps: Vec<StepOutcome>,
    /// Final state of every written identity
    pub snapshot: Vec<(Identity, EndorsementState)>,
}

impl RunReport {
    /// Number of rejected steps
    pub fn rejected(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, Outcome::Rejected { .. }))
            .count()
    }
}

/// Replay `script` against `registry`.
///
/// The script must have been validated; steps with missing fields are
/// reported as rejected rather than panicking.
pub fn execute<A: AccessController>(
    registry: &mut EndorsementRegistry<A>,
    script: &Script,
) -> RunReport {
    let steps = script
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| StepOutcome {
            index,
            op: step.op,
            outcome: run_step(registry, step),
        })
        .collect();

    RunReport {
        registry_id: registry.registry_id(),
        controller: registry.controller(),
        steps,
        snapshot: registry.snapshot(),
    }
}

fn run_step<A: AccessController>(registry: &mut EndorsementRegistry<A>, step: &Step) -> Outcome {
    let comment = step.comment.as_deref();
    let caller = match step.caller {
        Some(caller) => caller,
        None if step.op.needs_caller() => return missing("caller"),
        None => Identity::default(),
    };
    let identity = match step.identity {
        Some(identity) => identity,
        None if step.op.needs_identity() => return missing("identity"),
        None => Identity::default(),
    };

    let result = match step.op {
        StepOp::Request => registry.request_endorsement(caller, identity, comment),
        StepOp::Endorse => registry.endorse(caller, comment),
        StepOp::Revoke => registry.revoke_endorsement(caller, comment),
        StepOp::Remove => registry.remove_endorsement(caller, identity, comment),
        StepOp::Status => {
            return Outcome::Status {
                identity,
                state: registry.endorsement_status(&identity),
            }
        }
    };

    match result {
        Ok(event) => Outcome::Notified { event },
        Err(error) => Outcome::Rejected {
            error: error.to_string(),
        },
    }
}

fn missing(field: &str) -> Outcome {
    Outcome::Rejected {
        error: format!("missing `{field}`"),
    }
}
