//! Error types specific to APDU commands

/// A command that violates short-form encoding limits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Command data does not fit a single-byte Lc
    #[error("Data too long: {0} bytes (max {max})", max = crate::command::MAX_SHORT_DATA)]
    DataTooLong(usize),

    /// Raw bytes are not a valid short-form command
    #[error("Invalid command length: {0}")]
    InvalidLength(usize),
}

impl CommandError {
    /// Create a data too long error
    pub const fn data_too_long(actual: usize) -> Self {
        Self::DataTooLong(actual)
    }
}
