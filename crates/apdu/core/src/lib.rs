//! Core types for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the wire-level codec for ISO/IEC 7816-4 short-form
//! APDUs as used by PC/SC readers talking to MIFARE-family cards.
//!
//! ## Overview
//!
//! - [`Command`] is either a [`Command::Standard`] APDU with an explicit
//!   header or the PC/SC [`Command::VendorGetData`] pseudo-APDU.
//! - [`Command::encode`] lays the command out according to its [`IsoCase`].
//! - [`Response::from_bytes`] splits response data from the trailing
//!   [`StatusWord`].
//! - [`CardTransport`] is the single raw transmit primitive, and
//!   [`CardExecutor`] performs one encode → transmit → decode round trip.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod executor;
pub mod response;
pub mod transport;

// Core error types
mod error;
pub use error::{Error, Result};

pub use command::{ApduCommand, CLA_VENDOR, Command, IsoCase};
pub use executor::CardExecutor;
pub use response::status::StatusWord;
pub use response::{Response, is_success};
pub use transport::CardTransport;

#[cfg(any(test, feature = "mock"))]
pub use transport::mock::MockTransport;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        ApduCommand, Bytes, BytesMut, CardExecutor, CardTransport, Command, Error, IsoCase,
        Response, Result,
        command::error::CommandError,
        response::error::ResponseError,
        response::status::{StatusWord, common as status},
        transport::error::TransportError,
    };
}
