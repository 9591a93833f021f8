//! MIFARE card session over PC/SC
//!
//! [`MifareCard`] wraps one transport for the lifetime of one physical card
//! and exposes the four operations a PC/SC contactless reader understands
//! for MIFARE Classic: GET DATA (UID), LOAD KEY, GENERAL AUTHENTICATE and
//! READ BINARY. Card-level rejections come back as `Ok(false)` / `Ok(None)`;
//! only local validation failures and transport faults are errors.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod card;
pub mod commands;
mod constants;
mod error;
mod types;

pub use card::MifareCard;
pub use constants::*;
pub use error::{Error, Result};
pub use types::{KeyLocation, KeySlot, KeyType, MifareKey};

/// Render a UID the way readers print it, e.g. `04-A1-B2-C3`
pub fn format_uid(uid: &[u8]) -> String {
    uid.iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join("-")
}
