//! Transport traits for APDU communication with cards
//!
//! This module provides the seam between the codec and whatever carries the
//! bytes to the reader.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Trait for basic card transports
///
/// A transport is responsible for sending and receiving raw APDU bytes.
/// It has no knowledge of command structure or status words.
pub trait CardTransport: Send + fmt::Debug {
    /// Error type returned by the transport
    type Error: Into<crate::Error> + fmt::Debug;

    /// Send raw APDU bytes to card and return response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        trace!(command = %hex::encode_upper(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode_upper(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! Canned-response transport for tests

    use std::collections::VecDeque;

    use super::*;

    /// Replays queued responses and records every command it was sent
    #[derive(Debug, Clone, Default)]
    pub struct MockTransport {
        /// Responses to return, front first
        pub responses: VecDeque<Result<Bytes, TransportError>>,
        /// Commands that were sent
        pub commands: Vec<Bytes>,
        /// Whether the transport is connected
        pub connected: bool,
    }

    impl MockTransport {
        /// Create a new mock transport with the given responses
        pub fn new<I, B>(responses: I) -> Self
        where
            I: IntoIterator<Item = B>,
            B: Into<Bytes>,
        {
            Self {
                responses: responses.into_iter().map(|r| Ok(r.into())).collect(),
                commands: Vec::new(),
                connected: true,
            }
        }

        /// Create a new mock transport that answers once with success (90 00)
        pub fn with_success() -> Self {
            Self::new([Bytes::from_static(&[0x90, 0x00])])
        }

        /// Queue a transport fault as the next answer
        pub fn push_fault(&mut self, error: TransportError) {
            self.responses.push_back(Err(error));
        }
    }

    impl CardTransport for MockTransport {
        type Error = TransportError;

        fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
            if !self.connected {
                return Err(TransportError::Connection("mock disconnected".into()));
            }

            self.commands.push(Bytes::copy_from_slice(command));
            self.responses
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Transmission("no response queued".into())))
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }
}
