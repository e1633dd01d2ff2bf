//! Plain message errors

use crate::error::{Error, Payload};
use thiserror::Error;

/// An error that is nothing but its message.
///
/// Two messages compare as similar when their text is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{message}")]
pub struct Message {
    message: String,
}

impl Message {
    /// Create a new message error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the message text
    pub fn as_str(&self) -> &str {
        &self.message
    }
}

/// Create a bare message error without any stack information.
///
/// Use it for untyped sentinels and for the payloads passed to [`crate::wrap`].
pub fn new(message: impl Into<String>) -> Error {
    Error::Bare(Payload::new(Message::new(message)))
}
