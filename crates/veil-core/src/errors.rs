//! Unified error type for the visibility engine
//!
//! Resolvers never return errors: a missing entity, a tombstone or a stale
//! reveal flag turns into a conservative answer instead. [`DenialReason`]
//! names those cases so they can be logged and carried in
//! [`EngineError::ActionDenied`]. `EngineError` itself only appears at the
//! fallible edges: configuration loading, snapshot ingestion and action gating.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a resolver answered conservatively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DenialReason {
    /// A referenced target, root or subject is not loaded
    MissingEntity,
    /// The entity is marked deleted or not found
    TombstonedEntity,
    /// A reveal flag was recorded for a different viewer
    StaleRevealState,
    /// The requested transition is not allowed from the current state
    InvalidTransition,
    /// The viewer lacks the capability or rank for the action
    Unauthorized,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DenialReason::MissingEntity => "referenced entity is not loaded",
            DenialReason::TombstonedEntity => "entity has been removed",
            DenialReason::StaleRevealState => "reveal state belongs to another viewer",
            DenialReason::InvalidTransition => "transition not allowed from current state",
            DenialReason::Unauthorized => "viewer is not permitted",
        };
        f.write_str(text)
    }
}

/// Errors from the fallible edges of the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Invalid input
    #[error("Invalid: {message}")]
    Invalid {
        /// Description of the invalid input
        message: String,
    },

    /// Entity not found in the accessor
    #[error("Not found: {message}")]
    NotFound {
        /// What was looked up
        message: String,
    },

    /// An action intent was refused because its affordance is not available
    #[error("Action {action} denied: {reason}")]
    ActionDenied {
        /// Name of the refused action
        action: String,
        /// Why it was refused
        reason: DenialReason,
    },

    /// A reward level outside `1..=ceiling` was requested
    #[error("Reward level {requested} is outside 1..={ceiling}")]
    RewardAboveCeiling {
        /// Requested level
        requested: u8,
        /// Effective ceiling for the item
        ceiling: u8,
    },

    /// The external action layer failed to carry out a forwarded intent
    #[error("Dispatch error: {message}")]
    Dispatch {
        /// Failure reported by the action layer
        message: String,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Config error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Snapshot (de)serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure
        message: String,
    },
}

impl EngineError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an action denied error
    pub fn action_denied(action: impl Into<String>, reason: DenialReason) -> Self {
        Self::ActionDenied {
            action: action.into(),
            reason,
        }
    }

    /// Create a dispatch error
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether the error is a refused action rather than a malfunction
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            EngineError::ActionDenied { .. } | EngineError::RewardAboveCeiling { .. }
        )
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

/// Result alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
