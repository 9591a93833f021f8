use mifare_apdu_transport_pcsc::{PcscDeviceManager, PcscError, PcscTransport};
use mifare_card::{KeyLocation, KeySlot, KeyType, MifareCard, MifareKey, format_uid};
use tracing::debug;

use crate::utils::display;

/// Parameters of a block read
#[derive(Debug)]
pub struct ReadArgs<'a> {
    pub msb: u8,
    pub block: u8,
    pub length: u8,
    pub key: &'a str,
    pub key_type: KeyType,
    pub slot: u8,
    pub location: KeyLocation,
}

/// Read the UID of the card in `reader` and print it, `0` when there is none
pub fn read_uid(
    manager: &PcscDeviceManager,
    reader: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let uid = match manager.open_reader(reader) {
        Ok(transport) => MifareCard::new(transport).get_data()?,
        Err(PcscError::NoCard(_)) => None,
        Err(e) => return Err(e.into()),
    };

    match uid {
        Some(uid) => println!("UID: {}", format_uid(&uid)),
        None => println!("UID: 0"),
    }
    Ok(())
}

pub fn uid_command(
    manager: &PcscDeviceManager,
    reader: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    read_uid(manager, reader)
}

pub fn read_command(
    manager: &PcscDeviceManager,
    reader: &str,
    args: ReadArgs<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Validate everything before touching the card
    let key = MifareKey::from_hex(args.key)?;
    let slot = KeySlot::new(args.slot)?;

    let mut card: MifareCard<PcscTransport> = MifareCard::new(manager.open_reader(reader)?);

    if !card.load_key_into(args.location, slot, &key)? {
        return Err(format!("Reader refused the key for slot {}", slot.number()).into());
    }
    println!("{}", display::success("Key loaded"));

    if !card.authenticate(args.msb, args.block, args.key_type, slot.number())? {
        return Err(format!(
            "Authentication failed for block {:02X}{:02X}",
            args.msb, args.block
        )
        .into());
    }
    println!("{}", display::success("Authenticated"));

    match card.read_binary(args.msb, args.block, args.length)? {
        Some(data) => {
            println!("{}", display::info(&format!("Block {:02X}{:02X}:", args.msb, args.block)));
            println!("{}", display::hex_dump(&data));
        }
        None => {
            return Err(format!("Could not read block {:02X}{:02X}", args.msb, args.block).into());
        }
    }

    let transport = card.into_transport();
    if let Err(e) = transport.close() {
        debug!(error = %e, "Failed to release card");
    }
    Ok(())
}
