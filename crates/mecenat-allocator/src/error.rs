//! Structured error handling for the allocation engines.
//!
//! Engine mutations never fail on out-of-range values (those are clamped and
//! reported through `Clamped`); errors are reserved for unknown identifiers,
//! invalid configuration, and commit operations invoked while their validity
//! gate does not hold.

use mecenat_types::InvalidLevel;
use thiserror::Error;

/// Error type for allocation-engine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// A commit action (`submit`, `validate`) was invoked in an invalid
    /// state. The UI is expected to keep the action disabled; the engine
    /// still refuses the call.
    #[error("precondition not met for {operation}: {message}")]
    PreconditionNotMet {
        /// The refused operation.
        operation: &'static str,
        /// Why the gate did not hold.
        message: String,
    },

    /// An operation referenced a level key that is not configured.
    #[error("unknown level '{key}'")]
    UnknownLevel {
        /// The unrecognized key.
        key: String,
    },

    /// An operation referenced a project id absent from the catalog.
    #[error("unknown project {id}")]
    UnknownProject {
        /// The unrecognized catalog id.
        id: u32,
    },

    /// A level descriptor or engine configuration failed its invariant.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the violated constraint.
        message: String,
    },
}

impl AllocError {
    /// Error category for logging and assertions.
    pub fn category(&self) -> &'static str {
        match self {
            AllocError::PreconditionNotMet { .. } => "precondition",
            AllocError::UnknownLevel { .. } => "unknown_level",
            AllocError::UnknownProject { .. } => "unknown_project",
            AllocError::Configuration { .. } => "configuration",
        }
    }

    /// Refused commit action.
    pub fn precondition(operation: &'static str, message: impl Into<String>) -> Self {
        Self::PreconditionNotMet { operation, message: message.into() }
    }

    /// Unknown level key.
    pub fn unknown_level(key: impl Into<String>) -> Self {
        Self::UnknownLevel { key: key.into() }
    }

    /// Unknown catalog project.
    pub fn unknown_project(id: u32) -> Self {
        Self::UnknownProject { id }
    }
}

impl From<InvalidLevel> for AllocError {
    fn from(err: InvalidLevel) -> Self {
        Self::Configuration { message: err.to_string() }
    }
}

/// Result type alias for engine operations.
pub type AllocResult<T> = Result<T, AllocError>;
