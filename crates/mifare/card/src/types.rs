//! Key material and addressing types

use std::fmt;
use std::str::FromStr;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{KEY_LEN, MAX_KEY_SLOT};
use crate::error::Error;

/// Which sector key to authenticate with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyType {
    /// Key A
    KeyA = 0x60,
    /// Key B
    KeyB = 0x61,
}

impl KeyType {
    /// Byte sent in the authenticate data object
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Where the reader keeps a loaded key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum KeyLocation {
    /// Reader RAM, lost on power off
    #[default]
    Volatile = 0x00,
    /// Reader non-volatile memory
    NonVolatile = 0x20,
}

impl KeyLocation {
    /// Key structure byte (P1 of LOAD KEY)
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Reader key slot number, `0..=31`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeySlot(u8);

impl KeySlot {
    /// Validate a slot number
    pub const fn new(number: u8) -> Result<Self, Error> {
        if number > MAX_KEY_SLOT {
            return Err(Error::InvalidSlot(number));
        }
        Ok(Self(number))
    }

    /// Slot number
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for KeySlot {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

/// Six-byte MIFARE Classic sector key, wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MifareKey([u8; KEY_LEN]);

impl MifareKey {
    /// Factory default transport key
    pub const DEFAULT: [u8; KEY_LEN] = [0xFF; KEY_LEN];

    /// Wrap raw key bytes
    pub const fn new(key: [u8; KEY_LEN]) -> Self {
        Self(key)
    }

    /// Parse a key from 12 hex digits
    pub fn from_hex(text: &str) -> Result<Self, Error> {
        let mut key = [0u8; KEY_LEN];
        match hex::decode_to_slice(text, &mut key) {
            Ok(()) => Ok(Self(key)),
            Err(hex::FromHexError::InvalidStringLength) => {
                Err(Error::InvalidKeyLength(text.len() / 2))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Key bytes
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MifareKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; KEY_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidKeyLength(bytes.len()))
    }
}

impl FromStr for MifareKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for MifareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MifareKey(***)")
    }
}
