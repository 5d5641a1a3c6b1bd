//! Error taxonomy for the playground core
//!
//! Every variant is recoverable: operations catch these at their boundary and
//! turn them into a message the user can act on.

use thiserror::Error;

/// Errors produced while loading an ABI or executing a contract call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaygroundError {
    /// Malformed contract address
    #[error("Invalid contract address format. Must be 0x followed by 40 hex characters.")]
    Format,

    /// Malformed ABI JSON or malformed tuple/array argument JSON
    #[error("{0}")]
    Parse(String),

    /// The ABI has no function entries
    #[error("No functions found in ABI.")]
    EmptyAbi,

    /// Missing or unusable user input
    #[error("{0}")]
    Validation(String),

    /// Failure surfaced by the chain or wallet client, passed through verbatim
    #[error("{0}")]
    External(String),
}

impl PlaygroundError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap an external client failure, keeping the full cause chain
    pub fn external(err: anyhow::Error) -> Self {
        Self::External(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, PlaygroundError>;
