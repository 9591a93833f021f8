//! APDU command definitions
//!
//! This module provides the command side of the ISO/IEC 7816-4 codec. Only
//! short-form APDUs are produced: Lc and Le are single bytes.

pub mod error;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use error::CommandError;

/// Class byte reserved by PC/SC Part 3 for reader pseudo-APDUs
pub const CLA_VENDOR: u8 = 0xFF;

/// GET DATA instruction
pub const INS_GET_DATA: u8 = 0xCA;

/// Largest data field expressible with a single-byte Lc
pub const MAX_SHORT_DATA: usize = 255;

/// Header length: CLA, INS, P1, P2
const HEADER_LEN: usize = 4;

/// `FF CA 00 00 00`: return the card UID, up to 256 bytes
static VENDOR_GET_DATA: ApduCommand =
    ApduCommand::new_with_le(CLA_VENDOR, INS_GET_DATA, 0x00, 0x00, 0x00);

/// ISO 7816-3 command case, selected by which of Lc/Le are present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsoCase {
    /// Header only
    Case1,
    /// Header + Le
    Case2Short,
    /// Header + Lc + data
    Case3Short,
    /// Header + Lc + data + Le
    Case4Short,
}

impl IsoCase {
    /// Whether commands of this case carry a data field
    pub const fn has_data(&self) -> bool {
        matches!(self, Self::Case3Short | Self::Case4Short)
    }

    /// Whether commands of this case expect response data
    pub const fn expects_response(&self) -> bool {
        matches!(self, Self::Case2Short | Self::Case4Short)
    }
}

/// An APDU command with an explicit header
///
/// Fields are fixed at construction. An empty data field is stored as
/// absent, since short form has no encoding for `Lc = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduCommand {
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    data: Option<Bytes>,
    le: Option<u8>,
}

impl ApduCommand {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (Le)
    ///
    /// `le = 0x00` requests up to 256 bytes.
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self::new(cla, ins, p1, p2).with_data(data)
    }

    /// Create a new command with both data and expected length
    pub fn new_with_data_and_le<T: Into<Bytes>>(
        cla: u8,
        ins: u8,
        p1: u8,
        p2: u8,
        data: T,
        le: u8,
    ) -> Self {
        Self::new_with_le(cla, ins, p1, p2, le).with_data(data)
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        let data = data.into();
        self.data = (!data.is_empty()).then_some(data);
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: u8) -> Self {
        self.le = Some(le);
        self
    }

    /// Command class (CLA)
    pub const fn class(&self) -> u8 {
        self.cla
    }

    /// Instruction code (INS)
    pub const fn instruction(&self) -> u8 {
        self.ins
    }

    /// First parameter (P1)
    pub const fn p1(&self) -> u8 {
        self.p1
    }

    /// Second parameter (P2)
    pub const fn p2(&self) -> u8 {
        self.p2
    }

    /// Command payload data, if any
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Expected response length, if any
    pub const fn expected_length(&self) -> Option<u8> {
        self.le
    }

    /// The ISO case this command encodes as
    pub const fn case(&self) -> IsoCase {
        match (self.data.is_some(), self.le.is_some()) {
            (false, false) => IsoCase::Case1,
            (false, true) => IsoCase::Case2Short,
            (true, false) => IsoCase::Case3Short,
            (true, true) => IsoCase::Case4Short,
        }
    }

    /// Check the command against short-form limits
    pub fn validate(&self) -> Result<(), CommandError> {
        match self.data() {
            Some(data) if data.len() > MAX_SHORT_DATA => {
                Err(CommandError::data_too_long(data.len()))
            }
            _ => Ok(()),
        }
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        let data_len = self.data().map_or(0, |data| 1 + data.len());
        let le_len = usize::from(self.le.is_some());
        HEADER_LEN + data_len + le_len
    }

    /// Convert to raw APDU bytes
    pub fn encode(&self) -> Result<Bytes, CommandError> {
        self.validate()?;

        let mut buffer = BytesMut::with_capacity(self.command_length());
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        match (self.data(), self.le) {
            (None, None) => {}
            (None, Some(le)) => buffer.put_u8(le),
            (Some(data), le) => {
                // validate() bounds the length to a single byte
                buffer.put_u8(data.len() as u8);
                buffer.put_slice(data);
                if let Some(le) = le {
                    buffer.put_u8(le);
                }
            }
        }

        trace!(case = ?self.case(), len = buffer.len(), "Encoded APDU command");
        Ok(buffer.freeze())
    }

    /// Parse a short-form command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, CommandError> {
        let [cla, ins, p1, p2, body @ ..] = data else {
            return Err(CommandError::InvalidLength(data.len()));
        };
        let command = Self::new(*cla, *ins, *p1, *p2);

        match body {
            [] => Ok(command),
            [le] => Ok(command.with_le(*le)),
            [lc, rest @ ..] => {
                let lc = usize::from(*lc);
                if lc == 0 {
                    return Err(CommandError::InvalidLength(data.len()));
                }
                if rest.len() == lc {
                    Ok(command.with_data(Bytes::copy_from_slice(rest)))
                } else if rest.len() == lc + 1 {
                    Ok(command
                        .with_data(Bytes::copy_from_slice(&rest[..lc]))
                        .with_le(rest[lc]))
                } else {
                    Err(CommandError::InvalidLength(data.len()))
                }
            }
        }
    }
}

/// A command the codec knows how to encode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Any command with an explicit header, including other `FF` class
    /// reader commands
    Standard(ApduCommand),
    /// PC/SC GET DATA returning the card UID (`FF CA 00 00 00`)
    VendorGetData,
}

impl Command {
    /// The header and body this command is sent as
    pub fn apdu(&self) -> &ApduCommand {
        match self {
            Self::Standard(apdu) => apdu,
            Self::VendorGetData => &VENDOR_GET_DATA,
        }
    }

    /// The ISO case this command encodes as
    pub fn case(&self) -> IsoCase {
        self.apdu().case()
    }

    /// Convert to raw APDU bytes
    pub fn encode(&self) -> Result<Bytes, CommandError> {
        self.apdu().encode()
    }
}

impl From<ApduCommand> for Command {
    fn from(apdu: ApduCommand) -> Self {
        Self::Standard(apdu)
    }
}
