//! Status polling seam for the reader monitor

use std::ffi::CString;
use std::time::Duration;

use pcsc::{Context, ReaderState, State};
use tracing::trace;

use crate::error::PcscError;
use crate::event::CardState;

/// State of one reader as reported by a single poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderStatus {
    /// Reader name
    pub name: String,
    /// Observed card state
    pub state: CardState,
}

impl ReaderStatus {
    /// Create a status entry
    pub fn new(name: impl Into<String>, state: CardState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }
}

/// Something that can report the current state of named readers
///
/// The monitor clones the source into its watch thread on every start.
pub trait StatusSource: Clone + Send + 'static {
    /// Poll the current state of `readers`
    ///
    /// Readers missing from the returned list are treated as unavailable.
    /// An `Err` means the poll as a whole failed.
    fn poll(&mut self, readers: &[String]) -> Result<Vec<ReaderStatus>, PcscError>;
}

/// Status source backed by `SCardGetStatusChange`
#[derive(Clone)]
pub struct PcscStatusSource {
    context: Context,
}

impl std::fmt::Debug for PcscStatusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcscStatusSource").finish_non_exhaustive()
    }
}

impl PcscStatusSource {
    /// Create a status source on an established context
    pub const fn new(context: Context) -> Self {
        Self { context }
    }
}

impl StatusSource for PcscStatusSource {
    fn poll(&mut self, readers: &[String]) -> Result<Vec<ReaderStatus>, PcscError> {
        let mut states = readers
            .iter()
            .map(|name| {
                CString::new(name.as_str())
                    .map(|cname| ReaderState::new(cname, State::UNAWARE))
                    .map_err(|_| PcscError::ReaderNotFound(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // UNAWARE as the current state makes the call return immediately
        self.context.get_status_change(Duration::ZERO, &mut states)?;

        Ok(states
            .iter()
            .map(|state| {
                let name = state.name().to_string_lossy().into_owned();
                let card = card_state_from_flags(state.event_state(), state.atr())
                    .with_event_count(state.event_count());
                trace!(reader = %name, flags = ?state.event_state(), "Polled reader");
                ReaderStatus::new(name, card)
            })
            .collect())
    }
}

/// Map raw PC/SC event flags to a card state
pub(crate) fn card_state_from_flags(flags: State, atr: &[u8]) -> CardState {
    let state = if flags.intersects(State::UNKNOWN | State::UNAVAILABLE | State::IGNORE) {
        CardState::unavailable()
    } else if flags.contains(State::PRESENT) {
        CardState::present(atr)
    } else if flags.contains(State::EMPTY) {
        CardState::empty()
    } else {
        CardState::unavailable()
    };
    state.with_flags(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Presence;

    #[test]
    fn test_flag_mapping() {
        let atr = [0x3B, 0x8F, 0x80, 0x01];

        let present = card_state_from_flags(State::PRESENT | State::CHANGED, &atr);
        assert_eq!(present.presence, Presence::Present);
        assert_eq!(present.atr.as_deref(), Some(&atr[..]));
        assert!(present.flags.contains(State::CHANGED));

        let empty = card_state_from_flags(State::EMPTY, &[]);
        assert_eq!(empty.presence, Presence::Empty);
        assert!(empty.atr.is_none());

        // Shared-use flags do not hide a present card
        let in_use = card_state_from_flags(State::PRESENT | State::INUSE, &atr);
        assert_eq!(in_use.presence, Presence::Present);
    }

    #[test]
    fn test_unresponsive_flags() {
        for flags in [
            State::UNKNOWN,
            State::UNAVAILABLE,
            State::IGNORE,
            State::UNKNOWN | State::CHANGED,
            State::empty(),
        ] {
            assert_eq!(
                card_state_from_flags(flags, &[]).presence,
                Presence::Unavailable,
                "flags {flags:?}"
            );
        }
    }
}
