//! Error types for the store and for runtime configuration.
//!
//! Solver steps never fail: degenerate inputs are skipped. Only programmer
//! errors (unknown entities or component names) and rejected configuration
//! surface here.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors raised by [`crate::ecs::Store`] writes and named spawning.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity was never created or has been destroyed.
    #[error("unknown entity {0}")]
    UnknownEntity(Entity),

    /// A named spec referenced a component type the store does not know.
    #[error("unknown component {0}")]
    UnknownComponent(String),

    /// Component data in a named spec did not deserialize.
    #[error("invalid {name} component: {source}")]
    InvalidComponent {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The spec itself is not a JSON object of component entries.
    #[error("invalid entity spec: {0}")]
    InvalidSpec(String),
}

/// Errors raised when a configuration patch is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
