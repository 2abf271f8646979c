//! Error type shared by every operation on the variable tree.
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DapError>;

#[derive(Debug, Error)]
pub enum DapError {
    #[error("no variable named '{name}' in '{container}'")]
    NotFound { name: String, container: String },

    #[error("'{name}' is not a container")]
    NotAContainer { name: String },

    #[error("the variable '{name}' is used more than once in {type_name} '{container}'")]
    DuplicateName {
        name: String,
        container: String,
        type_name: String,
    },

    #[error("[index error][{variable}]: {reason}")]
    IndexOutOfRange { variable: String, reason: String },

    #[error("[shape error][{variable}]: {reason}")]
    InvalidShape { variable: String, reason: String },

    #[error("[type error][{variable}]: expected {expected}, found {found}")]
    TypeMismatch {
        variable: String,
        expected: String,
        found: String,
    },

    #[error("unexpected end of stream while reading '{variable}'")]
    UnexpectedEndOfStream { variable: String },

    #[error("[data error][{variable}]: {reason}")]
    DataMismatch { variable: String, reason: String },

    #[error("unsupported protocol version '{0}'")]
    UnsupportedVersion(String),

    #[error("transfer cancelled")]
    Cancelled,

    #[error("transfer cancelled by user")]
    UserCancelled,

    #[error("wire IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode value: {0}")]
    Serialize(#[from] bincode::error::EncodeError),

    #[error("failed to decode value: {0}")]
    Deserialize(bincode::error::DecodeError),
}

impl DapError {
    /// True for the cooperative abort variants; the caller may retry.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, DapError::Cancelled | DapError::UserCancelled)
    }
}
