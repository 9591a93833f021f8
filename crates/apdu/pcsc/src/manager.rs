//! Device manager for PC/SC operations

use pcsc::{Context, ReaderState, Scope, State};
use tracing::debug;

use crate::config::{MonitorConfig, PcscConfig};
use crate::error::PcscError;
use crate::event::{CardState, ReaderEventReceiver};
use crate::monitor::{PcscMonitor, PcscStatusSource};
use crate::reader::PcscReader;
use crate::transport::PcscTransport;

/// Manager for PC/SC device operations
#[allow(missing_debug_implementations)]
pub struct PcscDeviceManager {
    /// PC/SC context
    context: Context,
}

impl PcscDeviceManager {
    /// Create a new PC/SC device manager
    pub fn new() -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context })
    }

    /// List all available card readers
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let readers = match self.context.list_readers_owned() {
            Ok(readers) => readers,
            Err(pcsc::Error::NoReadersAvailable) => return Err(PcscError::NoReadersAvailable),
            Err(e) => return Err(e.into()),
        };
        if readers.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        let mut states: Vec<ReaderState> = readers
            .iter()
            .map(|name| ReaderState::new(name.clone(), State::UNAWARE))
            .collect();

        match self.context.get_status_change(None, &mut states) {
            Ok(()) => Ok(states.iter().map(PcscReader::from_reader_state).collect()),
            Err(e) => {
                // Still list the readers, with no card information
                debug!(error = %e, "Could not query reader states");
                Ok(readers
                    .into_iter()
                    .map(|name| {
                        PcscReader::new(
                            name.to_string_lossy().into_owned(),
                            CardState::unavailable(),
                        )
                    })
                    .collect())
            }
        }
    }

    /// Open a connection to a specific reader
    pub fn open_reader(&self, reader_name: &str) -> Result<PcscTransport, PcscError> {
        self.open_reader_with_config(reader_name, PcscConfig::default())
    }

    /// Open a connection to a specific reader with custom configuration
    pub fn open_reader_with_config(
        &self,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        PcscTransport::connect(&self.context, reader_name, config)
    }

    /// Status source sharing this manager's context
    pub fn status_source(&self) -> PcscStatusSource {
        PcscStatusSource::new(self.context.clone())
    }

    /// Create an idle monitor over this manager's context
    pub fn monitor(
        &self,
        config: MonitorConfig,
    ) -> (PcscMonitor<PcscStatusSource>, ReaderEventReceiver) {
        PcscMonitor::new(self.status_source(), config)
    }
}
