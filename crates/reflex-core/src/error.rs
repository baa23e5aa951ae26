//! Error types for reflex-core

use crate::identity::SubscriberId;
use thiserror::Error;

/// Core error type
///
/// Wrapping a non-composite value is deliberately not represented here:
/// [`observe`](crate::observe) treats it as a no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The root element selector cannot match anything
    #[error("Invalid root: {0}")]
    InvalidRoot(String),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// A path tried to descend into a value that has no properties
    #[error("Not an object at {path}: got {got}")]
    NotAnObject { path: String, got: String },

    /// A subscriber callback reported a failure
    #[error("Callback error: {0}")]
    Callback(String),

    /// A subscriber's callback kept changing its own watched value
    #[error("Update of {subscriber} did not settle after {passes} passes")]
    Unsettled {
        subscriber: SubscriberId,
        passes: usize,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for a callback failure
    pub fn callback(msg: impl Into<String>) -> Self {
        Error::Callback(msg.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
