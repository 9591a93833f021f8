//! Reader representation for PC/SC devices

use pcsc::ReaderState;

use crate::event::CardState;
use crate::monitor::card_state_from_flags;

/// Representation of a PC/SC card reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcscReader {
    /// Name of the reader
    name: String,

    /// Card state at listing time
    state: CardState,
}

impl PcscReader {
    /// Create a new reader
    pub const fn new(name: String, state: CardState) -> Self {
        Self { name, state }
    }

    /// Get the reader name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a card is present in the reader
    pub const fn has_card(&self) -> bool {
        self.state.has_card()
    }

    /// Get the ATR of the card if present
    pub fn atr(&self) -> Option<&[u8]> {
        self.state.atr.as_deref()
    }

    /// Card state at listing time
    pub const fn state(&self) -> &CardState {
        &self.state
    }

    /// Create a reader from a reader state
    pub(crate) fn from_reader_state(reader_state: &ReaderState) -> Self {
        Self {
            name: reader_state.name().to_string_lossy().into_owned(),
            state: card_state_from_flags(reader_state.event_state(), reader_state.atr())
                .with_event_count(reader_state.event_count()),
        }
    }
}
