//! Per-reader presence tracking
//!
//! Turns successive poll results into insertion and removal events. Pure
//! state, no I/O, so the transition rules are tested directly.

use tracing::debug;

use crate::error::PcscError;
use crate::event::{CardState, Presence, ReaderEvent};
use crate::monitor::ReaderStatus;

/// Card identity from the last definite answer
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seen {
    presence: Presence,
    atr: Option<Vec<u8>>,
    event_count: u32,
}

impl Seen {
    fn from_state(state: &CardState) -> Self {
        Self {
            presence: state.presence,
            atr: state.atr.clone(),
            event_count: state.event_count,
        }
    }

    /// A present card whose ATR or event counter moved was swapped between polls
    fn is_swapped_for(&self, state: &CardState) -> bool {
        self.presence == Presence::Present
            && state.has_card()
            && (self.atr != state.atr || self.event_count != state.event_count)
    }
}

/// What the monitor last knew about a reader
#[derive(Debug, Clone, PartialEq, Eq)]
enum Tracking {
    /// Nothing observed since monitoring started
    Unseen,
    /// Last poll answered with a definite presence
    Known(Seen),
    /// Reader stopped answering; keeps what was seen before that
    Unresponsive { last: Option<Seen> },
}

impl Tracking {
    fn into_last(self) -> Option<Seen> {
        match self {
            Self::Unseen => None,
            Self::Known(seen) => Some(seen),
            Self::Unresponsive { last } => last,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Tracker {
    names: Vec<String>,
    tracking: Vec<Tracking>,
}

impl Tracker {
    /// Track the given readers; duplicates collapse, order is kept
    pub(crate) fn new<I, N>(readers: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in readers {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        let tracking = vec![Tracking::Unseen; names.len()];
        Self { names, tracking }
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Apply one successful poll
    pub(crate) fn observe(&mut self, statuses: &[ReaderStatus]) -> Vec<ReaderEvent> {
        let mut events = Vec::new();
        for index in 0..self.names.len() {
            let state = statuses
                .iter()
                .find(|status| status.name == self.names[index])
                .map_or_else(CardState::unavailable, |status| status.state.clone());
            self.step(index, state, &mut events);
        }
        events
    }

    /// Apply a failed poll: every reader not already unresponsive reports it
    pub(crate) fn fault(&mut self, error: &PcscError) -> Vec<ReaderEvent> {
        let mut events = Vec::new();
        for (name, tracking) in self.names.iter().zip(self.tracking.iter_mut()) {
            if matches!(tracking, Tracking::Unresponsive { .. }) {
                continue;
            }
            let last = std::mem::replace(tracking, Tracking::Unseen).into_last();
            *tracking = Tracking::Unresponsive { last };
            events.push(ReaderEvent::Error {
                reader: name.clone(),
                error: error.clone(),
            });
        }
        events
    }

    fn step(&mut self, index: usize, state: CardState, events: &mut Vec<ReaderEvent>) {
        let reader = &self.names[index];
        let tracking = &mut self.tracking[index];

        if state.presence == Presence::Unavailable {
            if matches!(tracking, Tracking::Unresponsive { .. }) {
                return;
            }
            debug!(%reader, "Reader became unresponsive");
            let last = std::mem::replace(tracking, Tracking::Unseen).into_last();
            *tracking = Tracking::Unresponsive { last };
            events.push(ReaderEvent::Error {
                reader: reader.clone(),
                error: PcscError::ReaderUnavailable(reader.clone()),
            });
            return;
        }

        let previous = std::mem::replace(tracking, Tracking::Known(Seen::from_state(&state)));
        let reader = reader.clone();
        match previous.into_last() {
            None => {
                debug!(%reader, %state, "Reader initialized");
                events.push(ReaderEvent::Initialized { reader, state });
            }
            Some(last) if last.is_swapped_for(&state) => {
                debug!(%reader, %state, "Card swapped between polls");
                events.push(ReaderEvent::Removed {
                    reader: reader.clone(),
                    state: CardState::empty(),
                });
                events.push(ReaderEvent::Inserted { reader, state });
            }
            Some(last) if last.presence == state.presence => {}
            Some(_) if state.has_card() => {
                debug!(%reader, %state, "Card inserted");
                events.push(ReaderEvent::Inserted { reader, state });
            }
            Some(_) => {
                debug!(%reader, "Card removed");
                events.push(ReaderEvent::Removed { reader, state });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    const READER: &str = "ACS ACR122U PICC Interface";
    const ATR: [u8; 4] = [0x3B, 0x8F, 0x80, 0x01];

    fn status(state: CardState) -> Vec<ReaderStatus> {
        vec![ReaderStatus::new(READER, state)]
    }

    fn kinds(events: &[ReaderEvent]) -> Vec<EventKind> {
        events.iter().map(ReaderEvent::kind).collect()
    }

    #[test]
    fn test_first_poll_initializes() {
        let mut tracker = Tracker::new([READER]);
        let events = tracker.observe(&status(CardState::present(ATR)));
        assert_eq!(kinds(&events), [EventKind::Initialized]);
        assert!(events[0].state().is_some_and(CardState::has_card));

        // Unchanged presence is silent
        assert!(tracker.observe(&status(CardState::present(ATR))).is_empty());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut tracker = Tracker::new([READER]);
        tracker.observe(&status(CardState::empty()));

        assert_eq!(
            kinds(&tracker.observe(&status(CardState::present(ATR)))),
            [EventKind::Inserted]
        );
        assert!(tracker.observe(&status(CardState::present(ATR))).is_empty());
        assert_eq!(
            kinds(&tracker.observe(&status(CardState::empty()))),
            [EventKind::Removed]
        );
        assert!(tracker.observe(&status(CardState::empty())).is_empty());
    }

    #[test]
    fn test_unresponsive_reports_once() {
        let mut tracker = Tracker::new([READER]);
        tracker.observe(&status(CardState::present(ATR)));

        let events = tracker.observe(&status(CardState::unavailable()));
        assert_eq!(kinds(&events), [EventKind::Error]);
        assert!(tracker.observe(&status(CardState::unavailable())).is_empty());

        // Back with the same card: nothing happened from the caller's view
        assert!(tracker.observe(&status(CardState::present(ATR))).is_empty());
    }

    #[test]
    fn test_recovery_reports_real_transition() {
        let mut tracker = Tracker::new([READER]);
        tracker.observe(&status(CardState::present(ATR)));
        tracker.observe(&status(CardState::unavailable()));

        assert_eq!(
            kinds(&tracker.observe(&status(CardState::empty()))),
            [EventKind::Removed]
        );
    }

    #[test]
    fn test_recovery_of_unseen_reader_initializes() {
        let mut tracker = Tracker::new([READER]);
        assert_eq!(
            kinds(&tracker.observe(&status(CardState::unavailable()))),
            [EventKind::Error]
        );
        assert_eq!(
            kinds(&tracker.observe(&status(CardState::empty()))),
            [EventKind::Initialized]
        );
    }

    #[test]
    fn test_missing_reader_is_unavailable() {
        let mut tracker = Tracker::new([READER, "Other Reader"]);
        let events = tracker.observe(&status(CardState::empty()));
        assert_eq!(kinds(&events), [EventKind::Initialized, EventKind::Error]);
        assert_eq!(events[1].reader(), "Other Reader");
    }

    #[test]
    fn test_poll_fault_marks_every_reader() {
        let mut tracker = Tracker::new([READER, "Other Reader"]);
        tracker.observe(&[
            ReaderStatus::new(READER, CardState::empty()),
            ReaderStatus::new("Other Reader", CardState::unavailable()),
        ]);

        let error = PcscError::Pcsc(pcsc::Error::NoService);
        let events = tracker.fault(&error);
        // The second reader was already unresponsive
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            ReaderEvent::Error { reader, error: e } if reader == READER && *e == error
        ));
        assert!(tracker.fault(&error).is_empty());
    }

    #[test]
    fn test_swap_between_polls() {
        let mut tracker = Tracker::new([READER]);
        tracker.observe(&status(CardState::present([0x3B, 0x01])));

        let events = tracker.observe(&status(CardState::present([0x3B, 0x02])));
        assert_eq!(kinds(&events), [EventKind::Removed, EventKind::Inserted]);
        assert_eq!(
            events[1].state().and_then(|state| state.atr.as_deref()),
            Some(&[0x3B, 0x02][..])
        );
        assert!(tracker.observe(&status(CardState::present([0x3B, 0x02]))).is_empty());
    }

    #[test]
    fn test_event_count_reveals_reinsert_of_same_card() {
        let mut tracker = Tracker::new([READER]);
        tracker.observe(&status(CardState::present(ATR).with_event_count(1)));

        assert_eq!(
            kinds(&tracker.observe(&status(CardState::present(ATR).with_event_count(3)))),
            [EventKind::Removed, EventKind::Inserted]
        );
        assert!(tracker.observe(&status(CardState::present(ATR).with_event_count(3))).is_empty());
    }

    #[test]
    fn test_swap_across_unresponsive_period() {
        let mut tracker = Tracker::new([READER]);
        tracker.observe(&status(CardState::present([0x3B, 0x01])));
        tracker.fault(&PcscError::Pcsc(pcsc::Error::NoService));

        assert_eq!(
            kinds(&tracker.observe(&status(CardState::present([0x3B, 0x02])))),
            [EventKind::Removed, EventKind::Inserted]
        );
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let tracker = Tracker::new([READER, READER, "Other Reader"]);
        assert_eq!(tracker.names(), [READER, "Other Reader"]);
        assert!(Tracker::new(Vec::<String>::new()).is_empty());
    }
}
