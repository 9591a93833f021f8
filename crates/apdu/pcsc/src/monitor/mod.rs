//! Background monitor for card insertion and removal
//!
//! A [`PcscMonitor`] watches a fixed set of readers on a dedicated thread and
//! publishes [`ReaderEvent`]s on a channel. The thread sleeps on a cancel
//! channel between polls, so [`PcscMonitor::cancel`] wakes it at once.

mod source;
mod tracker;

use std::fmt;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};
use parking_lot::Mutex;
use tracing::{debug, warn};

pub(crate) use source::card_state_from_flags;
pub use source::{PcscStatusSource, ReaderStatus, StatusSource};
use tracker::Tracker;

use crate::config::MonitorConfig;
use crate::error::PcscError;
use crate::event::{ReaderEvent, ReaderEventReceiver, ReaderEventSender, reader_event_channel};

/// Name given to the watch thread
pub const MONITOR_THREAD_NAME: &str = "reader-monitor";

enum MonitorState {
    Idle,
    Watching {
        cancel: Sender<()>,
        thread: JoinHandle<()>,
    },
}

/// Reader monitor
///
/// Events from successive runs go to the same receiver returned by
/// [`PcscMonitor::new`].
pub struct PcscMonitor<S: StatusSource = PcscStatusSource> {
    source: S,
    config: MonitorConfig,
    sender: ReaderEventSender,
    state: Mutex<MonitorState>,
}

impl<S: StatusSource> PcscMonitor<S> {
    /// Create an idle monitor and the receiver its events go to
    pub fn new(source: S, config: MonitorConfig) -> (Self, ReaderEventReceiver) {
        let (sender, receiver) = reader_event_channel();
        let monitor = Self {
            source,
            config,
            sender,
            state: Mutex::new(MonitorState::Idle),
        };
        (monitor, receiver)
    }

    /// Monitor configuration
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Start watching the named readers
    ///
    /// Tracking starts from scratch, so the first poll of each reader yields
    /// an `Initialized` event.
    pub fn start<I, N>(&self, readers: I) -> Result<(), PcscError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut state = self.state.lock();

        if let MonitorState::Watching { thread, .. } = &*state {
            if !thread.is_finished() {
                return Err(PcscError::AlreadyMonitoring);
            }
        }
        // Reap a watch thread that stopped on its own
        let previous = std::mem::replace(&mut *state, MonitorState::Idle);
        if let MonitorState::Watching { thread, .. } = previous {
            if thread.join().is_err() {
                warn!("Reader monitor thread panicked");
            }
        }

        let tracker = Tracker::new(readers);
        if tracker.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        let (cancel, cancelled) = bounded(1);
        let watch = Watch {
            source: self.source.clone(),
            tracker,
            events: self.sender.clone(),
            cancelled,
            config: self.config,
        };
        let thread = thread::Builder::new()
            .name(MONITOR_THREAD_NAME.into())
            .spawn(move || watch.run())
            .map_err(|e| PcscError::Other(format!("Failed to spawn monitor thread: {e}")))?;

        *state = MonitorState::Watching { cancel, thread };
        Ok(())
    }

    /// Stop watching and wait for the watch thread to exit
    ///
    /// Does nothing when idle. Events already sent stay in the channel.
    pub fn cancel(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), MonitorState::Idle);
        if let MonitorState::Watching { cancel, thread } = previous {
            drop(cancel);
            if thread.join().is_err() {
                warn!("Reader monitor thread panicked");
            }
            debug!("Reader monitor cancelled");
        }
    }

    /// Whether the watch thread is running
    pub fn is_watching(&self) -> bool {
        match &*self.state.lock() {
            MonitorState::Idle => false,
            MonitorState::Watching { thread, .. } => !thread.is_finished(),
        }
    }
}

impl<S: StatusSource> Drop for PcscMonitor<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl<S: StatusSource + fmt::Debug> fmt::Debug for PcscMonitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscMonitor")
            .field("source", &self.source)
            .field("config", &self.config)
            .field("watching", &self.is_watching())
            .finish()
    }
}

/// State owned by the watch thread
struct Watch<S> {
    source: S,
    tracker: Tracker,
    events: ReaderEventSender,
    cancelled: Receiver<()>,
    config: MonitorConfig,
}

impl<S: StatusSource> Watch<S> {
    fn run(mut self) {
        debug!(readers = ?self.tracker.names(), "Reader monitor started");

        loop {
            let events = match self.source.poll(self.tracker.names()) {
                Ok(statuses) => self.tracker.observe(&statuses),
                Err(error) => {
                    warn!(%error, "Reader status poll failed");
                    self.tracker.fault(&error)
                }
            };

            if self.is_cancelled() {
                break;
            }
            if !self.deliver(events) {
                debug!("Event receiver dropped");
                break;
            }

            match self.cancelled.recv_timeout(self.config.poll_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        debug!("Reader monitor stopped");
    }

    fn is_cancelled(&self) -> bool {
        !matches!(self.cancelled.try_recv(), Err(TryRecvError::Empty))
    }

    /// Returns false once nobody is listening
    fn deliver(&self, events: Vec<ReaderEvent>) -> bool {
        events.into_iter().all(|event| self.events.send(event).is_ok())
    }
}
