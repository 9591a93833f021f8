//! Error types for PC/SC transport

use mifare_apdu_core::transport::TransportError;

/// PC/SC-specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// Reader stopped answering status polls
    #[error("Reader unavailable: {0}")]
    ReaderUnavailable(String),

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),

    /// Card was removed or reset mid-session
    #[error("Card was removed")]
    CardRemoved,

    /// Monitor is already watching
    #[error("Monitor is already running")]
    AlreadyMonitoring,

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::NoCard(reader) => Self::NoCard(reader),
            PcscError::CardRemoved
            | PcscError::Pcsc(pcsc::Error::RemovedCard | pcsc::Error::ResetCard) => {
                Self::CardRemoved
            }
            PcscError::Pcsc(pcsc::Error::Timeout) => Self::Timeout,
            PcscError::ReaderNotFound(_)
            | PcscError::ReaderUnavailable(_)
            | PcscError::NoReadersAvailable
            | PcscError::Pcsc(
                pcsc::Error::NoService
                | pcsc::Error::ReaderUnavailable
                | pcsc::Error::UnknownReader,
            ) => Self::Connection(error.to_string()),
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<PcscError> for mifare_apdu_core::Error {
    fn from(error: PcscError) -> Self {
        Self::Transport(error.into())
    }
}
