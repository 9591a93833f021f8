//! PC/SC Part 3 constants for contactless storage cards

/// Class byte of every PC/SC pseudo-APDU
pub const CLA_PCSC: u8 = 0xFF;

/// Instruction codes
pub mod ins {
    /// GET DATA
    pub const GET_DATA: u8 = 0xCA;
    /// LOAD KEYS
    pub const LOAD_KEY: u8 = 0x82;
    /// GENERAL AUTHENTICATE
    pub const AUTHENTICATE: u8 = 0x86;
    /// READ BINARY
    pub const READ_BINARY: u8 = 0xB0;
}

/// Highest key slot number a reader accepts
pub const MAX_KEY_SLOT: u8 = 31;

/// Length of a MIFARE Classic sector key
pub const KEY_LEN: usize = 6;

/// Version byte opening the GENERAL AUTHENTICATE data object
pub const AUTHENTICATE_VERSION: u8 = 0x01;
