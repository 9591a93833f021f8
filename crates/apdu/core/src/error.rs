//! Core error type for all APDU operations
//!
//! Each layer (command encoding, response decoding, transport) has its own
//! error type. This umbrella type lets callers bubble any of them up with `?`.

use crate::command::error::CommandError;
use crate::response::error::ResponseError;
use crate::transport::error::TransportError;

/// Result type for APDU operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Command could not be encoded; nothing was transmitted
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Response bytes could not be decoded
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The underlying transport reported a fault
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    /// Whether this error originated in the transport layer
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether this error is a protocol-shape defect (malformed command or
    /// truncated response)
    pub const fn is_protocol(&self) -> bool {
        matches!(self, Self::Command(_) | Self::Response(_))
    }
}
