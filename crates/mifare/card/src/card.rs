//! Card session implementation

use bytes::Bytes;
use mifare_apdu_core::{CardExecutor, CardTransport, Command};
use tracing::{debug, instrument};

use crate::commands;
use crate::types::{KeyLocation, KeySlot, KeyType, MifareKey};
use crate::{Error, Result};

/// One session against one physical card
///
/// Every operation sends exactly one APDU and waits for exactly one
/// response. The session keeps no record of which keys were loaded or which
/// sector is authenticated; the reader does.
#[derive(Debug)]
pub struct MifareCard<T: CardTransport> {
    executor: CardExecutor<T>,
}

impl<T: CardTransport> MifareCard<T> {
    /// Open a session on a connected transport
    pub const fn new(transport: T) -> Self {
        Self {
            executor: CardExecutor::new(transport),
        }
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        self.executor.transport()
    }

    /// End the session and hand the transport back
    pub fn into_transport(self) -> T {
        self.executor.into_transport()
    }

    /// Read the card UID
    ///
    /// `None` when the reader answers with anything but 90 00, which is what
    /// an empty field looks like on most readers.
    #[instrument(level = "debug", skip(self))]
    pub fn get_data(&mut self) -> Result<Option<Bytes>> {
        let uid = self.send(&commands::get_uid())?;
        match &uid {
            Some(uid) => debug!(uid = %hex::encode_upper(uid), "Read card UID"),
            None => debug!("No UID returned"),
        }
        Ok(uid)
    }

    /// Load a six-byte key into a reader slot
    ///
    /// The slot and key are checked before anything is sent. Returns whether
    /// the reader accepted the key.
    #[instrument(level = "debug", skip(self, key))]
    pub fn load_key(&mut self, location: KeyLocation, slot: u8, key: &[u8]) -> Result<bool> {
        let slot = KeySlot::new(slot)?;
        let key = MifareKey::try_from(key)?;
        self.load_key_into(location, slot, &key)
    }

    /// Load an already validated key
    pub fn load_key_into(
        &mut self,
        location: KeyLocation,
        slot: KeySlot,
        key: &MifareKey,
    ) -> Result<bool> {
        let accepted = self.acknowledged(&commands::load_key(location, slot, key))?;
        debug!(?location, slot = slot.number(), accepted, "Load key");
        Ok(accepted)
    }

    /// Authenticate a block with the key held in `slot`
    ///
    /// A rejected authentication is `Ok(false)`.
    #[instrument(level = "debug", skip(self))]
    pub fn authenticate(
        &mut self,
        msb: u8,
        block: u8,
        key_type: KeyType,
        slot: u8,
    ) -> Result<bool> {
        let slot = KeySlot::new(slot)?;
        let accepted = self.acknowledged(&commands::authenticate(msb, block, key_type, slot))?;
        debug!(accepted, "Authenticate");
        Ok(accepted)
    }

    /// Read `length` bytes starting at the given block
    ///
    /// `None` when the reader refuses, e.g. the sector is not authenticated.
    #[instrument(level = "debug", skip(self))]
    pub fn read_binary(&mut self, msb: u8, block: u8, length: u8) -> Result<Option<Bytes>> {
        let data = self.send(&commands::read_binary(msb, block, length))?;
        debug!(read = data.as_ref().map(Bytes::len), "Read binary");
        Ok(data)
    }

    fn send(&mut self, command: &Command) -> Result<Option<Bytes>> {
        let response = self.executor.transmit(command).map_err(Error::from)?;
        Ok(response.into_success_data())
    }

    fn acknowledged(&mut self, command: &Command) -> Result<bool> {
        let response = self.executor.transmit(command).map_err(Error::from)?;
        Ok(response.is_success())
    }
}
