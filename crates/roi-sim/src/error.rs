//! Error types for the simulator controller
//!
//! Maps the four failure families of the form onto Rust types:
//! - local validation (nothing is sent)
//! - request failures (server message or a generic fallback)
//! - busy rejection when an action of the same kind is pending
//! - configuration and file-system failures around the controller

use crate::state_machine::{ActionEvent, ActionKind, ActionState};
use roi_client::ApiError;
use roi_core::ValidationError;
use std::path::PathBuf;

/// Controller error
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// Rejected locally before any request
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Service rejected the request or could not be reached
    #[error("{message}")]
    Request {
        /// Message shown to the user
        message: String,
        /// Underlying client error
        #[source]
        source: ApiError,
    },

    /// Action of this kind is already pending
    #[error("{0} already in progress")]
    Busy(ActionKind),

    /// Report could not be written to disk
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Illegal action transition
    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client could not be built
    #[error("client error: {0}")]
    Client(ApiError),
}

impl SimulatorError {
    /// Build a request error with the user-facing message resolved
    pub fn request(source: ApiError, fallback: &str) -> Self {
        Self::Request {
            message: source.user_message(fallback),
            source,
        }
    }

    /// Whether nothing reached the network
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Busy(_))
    }
}

/// Action state machine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Start requested while the same kind is pending
    #[error("{0} already pending")]
    AlreadyPending(ActionKind),

    /// Transition not allowed from this state
    #[error("illegal transition for {kind}: {event:?} from {from:?}")]
    IllegalTransition {
        kind: ActionKind,
        from: ActionState,
        event: ActionEvent,
    },
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_user_message() {
        let err = SimulatorError::request(
            ApiError::Status {
                status: 400,
                message: Some("Inputs must be non-negative numbers".to_string()),
            },
            "Simulation failed",
        );
        assert_eq!(err.to_string(), "Inputs must be non-negative numbers");
        assert!(!err.is_local());

        let err = SimulatorError::request(ApiError::Transport("refused".into()), "Simulation failed");
        assert_eq!(err.to_string(), "Simulation failed");
    }

    #[test]
    fn busy_is_local() {
        let err = SimulatorError::Busy(ActionKind::Save);
        assert!(err.is_local());
        assert_eq!(err.to_string(), "save already in progress");
    }

    #[test]
    fn validation_conversion() {
        let err: SimulatorError = ValidationError::EmptyScenarioName.into();
        assert!(matches!(err, SimulatorError::Validation(_)));
        assert!(err.is_local());
    }
}
