//! Command builders for the PC/SC storage card pseudo-APDUs

use bytes::{BufMut, BytesMut};
use mifare_apdu_core::{ApduCommand, Command};

use crate::constants::{AUTHENTICATE_VERSION, CLA_PCSC, ins};
use crate::types::{KeyLocation, KeySlot, KeyType, MifareKey};

/// GET DATA for the card UID: `FF CA 00 00 00`
pub const fn get_uid() -> Command {
    Command::VendorGetData
}

/// LOAD KEYS: `FF 82 <location> <slot> 06 <key>`
pub fn load_key(location: KeyLocation, slot: KeySlot, key: &MifareKey) -> Command {
    ApduCommand::new_with_data(
        CLA_PCSC,
        ins::LOAD_KEY,
        location.code(),
        slot.number(),
        key.as_bytes().to_vec(),
    )
    .into()
}

/// GENERAL AUTHENTICATE: `FF 86 00 00 05 01 <msb> <block> <key type> <slot>`
pub fn authenticate(msb: u8, block: u8, key_type: KeyType, slot: KeySlot) -> Command {
    let mut data = BytesMut::with_capacity(5);
    data.put_u8(AUTHENTICATE_VERSION);
    data.put_u8(msb);
    data.put_u8(block);
    data.put_u8(key_type.code());
    data.put_u8(slot.number());

    ApduCommand::new_with_data(CLA_PCSC, ins::AUTHENTICATE, 0x00, 0x00, data.freeze()).into()
}

/// READ BINARY: `FF B0 <msb> <block> <length>`
pub const fn read_binary(msb: u8, block: u8, length: u8) -> Command {
    Command::Standard(ApduCommand::new_with_le(
        CLA_PCSC,
        ins::READ_BINARY,
        msb,
        block,
        length,
    ))
}

#[cfg(test)]
mod tests {
    use mifare_apdu_core::IsoCase;

    use super::*;

    fn encoded(command: &Command) -> String {
        hex::encode_upper(command.encode().unwrap())
    }

    #[test]
    fn test_get_uid() {
        assert_eq!(encoded(&get_uid()), "FFCA000000");
    }

    #[test]
    fn test_load_key_layout() {
        let key = MifareKey::new(MifareKey::DEFAULT);
        let command = load_key(KeyLocation::NonVolatile, KeySlot::new(0).unwrap(), &key);
        assert_eq!(command.case(), IsoCase::Case3Short);
        assert_eq!(encoded(&command), "FF82200006FFFFFFFFFFFF");

        let key = MifareKey::from_hex("A0A1A2A3A4A5").unwrap();
        let command = load_key(KeyLocation::Volatile, KeySlot::new(31).unwrap(), &key);
        assert_eq!(encoded(&command), "FF82001F06A0A1A2A3A4A5");
    }

    #[test]
    fn test_authenticate_layout() {
        let command = authenticate(0x00, 0x04, KeyType::KeyA, KeySlot::new(0).unwrap());
        assert_eq!(command.case(), IsoCase::Case3Short);
        assert_eq!(encoded(&command), "FF860000050100046000");

        let command = authenticate(0x01, 0x08, KeyType::KeyB, KeySlot::new(1).unwrap());
        assert_eq!(encoded(&command), "FF860000050101086101");
    }

    #[test]
    fn test_read_binary_layout() {
        let command = read_binary(0x00, 0x04, 16);
        assert_eq!(command.case(), IsoCase::Case2Short);
        assert_eq!(encoded(&command), "FFB0000410");
    }
}
