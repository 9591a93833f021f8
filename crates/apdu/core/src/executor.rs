//! Executor for APDU command execution
//!
//! One call, one frame: encode the command, hand it to the transport, decode
//! whatever comes back. No GET RESPONSE chaining and no retry.

use tracing::{Level, debug, info, instrument, warn};

use crate::command::Command;
use crate::response::Response;
use crate::transport::CardTransport;
use crate::{Error, Result};

/// Card executor owning a transport for its whole lifetime
#[derive(Debug)]
pub struct CardExecutor<T: CardTransport> {
    /// The transport used for communication
    transport: T,
    /// The last response received
    last_response: Option<Response>,
}

impl<T: CardTransport> CardExecutor<T> {
    /// Create a new card executor with the given transport
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            last_response: None,
        }
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Get the last response received
    pub const fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }

    /// Send one command and wait for its response
    ///
    /// Malformed commands are rejected before anything reaches the
    /// transport. A non-success status word is still `Ok`; callers decide
    /// what a rejection means.
    #[instrument(level = "trace", skip_all, fields(ins = command.apdu().instruction()))]
    pub fn transmit(&mut self, command: &Command) -> Result<Response> {
        let bytes = command.encode()?;
        let raw = self
            .transport
            .transmit_raw(&bytes)
            .map_err(Into::<Error>::into)?;
        let response = Response::from_bytes(&raw)?;

        let status = response.status();
        let level = status.tracing_level();
        if level == Level::DEBUG {
            debug!(%status, "Command completed");
        } else if level == Level::INFO {
            info!(%status, reason = status.description(), "Command completed");
        } else {
            warn!(%status, reason = status.description(), "Command rejected");
        }

        self.last_response = Some(response.clone());
        Ok(response)
    }
}
