/// Result type for card operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for card operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Key slot outside the reader's range
    #[error("Invalid key slot {0} (max {max})", max = crate::MAX_KEY_SLOT)]
    InvalidSlot(u8),

    /// Key is not six bytes long
    #[error("Invalid key length: {0} bytes (expected {len})", len = crate::KEY_LEN)]
    InvalidKeyLength(usize),

    /// Key text is not valid hex
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(#[from] hex::FromHexError),

    /// Codec or transport failure
    #[error(transparent)]
    Apdu(#[from] mifare_apdu_core::Error),
}

impl Error {
    /// Whether the request was rejected before anything was sent
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidSlot(_) | Self::InvalidKeyLength(_) | Self::InvalidKeyEncoding(_)
        )
    }
}
