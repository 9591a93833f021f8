//! Error types specific to card transport

/// Transport error type
///
/// Variants carry the driver's own description where one exists so the
/// fault stays diagnosable after crossing crate boundaries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Failed to connect to the reader or card
    #[error("Failed to connect to device: {0}")]
    Connection(String),

    /// No card is present in the reader
    #[error("No card present in reader {0}")]
    NoCard(String),

    /// Card was removed or reset during the exchange
    #[error("Card was removed or reset")]
    CardRemoved,

    /// Transmission failed
    #[error("Failed to transmit data: {0}")]
    Transmission(String),

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,

    /// Other driver error
    #[error("{0}")]
    Other(String),
}
