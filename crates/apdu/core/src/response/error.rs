//! Error types specific to APDU responses

/// Error for APDU response decoding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseError {
    /// Fewer than the two status bytes were returned
    #[error("Truncated response: {0} byte(s), need at least 2")]
    Truncated(usize),
}
