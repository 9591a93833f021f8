//! Event types for reader monitoring

mod channel;
pub use channel::{ReaderEventReceiver, ReaderEventSender, reader_event_channel};

use std::fmt;

use pcsc::State;

use crate::error::PcscError;

/// Whether a card sits in the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// No card in the field
    Empty,
    /// A card is present
    Present,
    /// The reader did not report a usable state
    Unavailable,
}

/// Snapshot of a reader's card state at poll time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardState {
    /// Card presence
    pub presence: Presence,
    /// Answer To Reset when a card is present
    pub atr: Option<Vec<u8>>,
    /// Raw PC/SC event flags
    pub flags: State,
    /// Insertion/removal counter reported by the reader, 0 when unsupported
    pub event_count: u32,
}

impl CardState {
    /// Reader with no card
    pub const fn empty() -> Self {
        Self {
            presence: Presence::Empty,
            atr: None,
            flags: State::EMPTY,
            event_count: 0,
        }
    }

    /// Reader holding a card with the given ATR
    pub fn present(atr: impl Into<Vec<u8>>) -> Self {
        Self {
            presence: Presence::Present,
            atr: Some(atr.into()),
            flags: State::PRESENT,
            event_count: 0,
        }
    }

    /// Reader that did not answer
    pub const fn unavailable() -> Self {
        Self {
            presence: Presence::Unavailable,
            atr: None,
            flags: State::UNAVAILABLE,
            event_count: 0,
        }
    }

    /// Replace the raw flag set
    pub const fn with_flags(mut self, flags: State) -> Self {
        self.flags = flags;
        self
    }

    /// Replace the event counter
    pub const fn with_event_count(mut self, event_count: u32) -> Self {
        self.event_count = event_count;
        self
    }

    /// Whether a card is present
    pub const fn has_card(&self) -> bool {
        matches!(self.presence, Presence::Present)
    }
}

impl fmt::Display for CardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.presence, &self.atr) {
            (Presence::Present, Some(atr)) => {
                write!(f, "card present (ATR {})", hex::encode_upper(atr))
            }
            (Presence::Present, None) => f.write_str("card present"),
            (Presence::Empty, _) => f.write_str("empty"),
            (Presence::Unavailable, _) => f.write_str("unavailable"),
        }
    }
}

/// Events raised by the reader monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// First observation of a reader after monitoring started
    Initialized {
        /// Reader name
        reader: String,
        /// Observed state
        state: CardState,
    },
    /// Card was inserted into a reader
    Inserted {
        /// Reader name
        reader: String,
        /// State after insertion
        state: CardState,
    },
    /// Card was removed from a reader
    Removed {
        /// Reader name
        reader: String,
        /// State after removal
        state: CardState,
    },
    /// The reader could not be polled
    Error {
        /// Reader name
        reader: String,
        /// Underlying fault
        error: PcscError,
    },
}

/// Discriminant of a [`ReaderEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`ReaderEvent::Initialized`]
    Initialized,
    /// See [`ReaderEvent::Inserted`]
    Inserted,
    /// See [`ReaderEvent::Removed`]
    Removed,
    /// See [`ReaderEvent::Error`]
    Error,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initialized => "Initialized",
            Self::Inserted => "Inserted",
            Self::Removed => "Removed",
            Self::Error => "Error",
        })
    }
}

impl ReaderEvent {
    /// Name of the reader the event is about
    pub fn reader(&self) -> &str {
        match self {
            Self::Initialized { reader, .. }
            | Self::Inserted { reader, .. }
            | Self::Removed { reader, .. }
            | Self::Error { reader, .. } => reader,
        }
    }

    /// Kind of event
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Initialized { .. } => EventKind::Initialized,
            Self::Inserted { .. } => EventKind::Inserted,
            Self::Removed { .. } => EventKind::Removed,
            Self::Error { .. } => EventKind::Error,
        }
    }

    /// Card state carried by the event, if any
    pub const fn state(&self) -> Option<&CardState> {
        match self {
            Self::Initialized { state, .. }
            | Self::Inserted { state, .. }
            | Self::Removed { state, .. } => Some(state),
            Self::Error { .. } => None,
        }
    }
}

impl fmt::Display for ReaderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Event for reader: {}", self.kind(), self.reader())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let event = ReaderEvent::Inserted {
            reader: "ACS ACR122U".into(),
            state: CardState::present([0x3B, 0x8F]),
        };
        assert_eq!(event.reader(), "ACS ACR122U");
        assert_eq!(event.kind(), EventKind::Inserted);
        assert!(event.state().is_some_and(CardState::has_card));
        assert_eq!(event.to_string(), "Inserted Event for reader: ACS ACR122U");

        let error = ReaderEvent::Error {
            reader: "ACS ACR122U".into(),
            error: PcscError::ReaderUnavailable("ACS ACR122U".into()),
        };
        assert!(error.state().is_none());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(
            CardState::present([0x3B, 0x8F]).to_string(),
            "card present (ATR 3B8F)"
        );
        assert_eq!(CardState::empty().to_string(), "empty");
        assert_eq!(CardState::unavailable().to_string(), "unavailable");
    }
}
