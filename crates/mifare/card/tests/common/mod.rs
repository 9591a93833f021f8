//! Simulated reader with a MIFARE Classic 1K in the field

use std::collections::HashMap;

use mifare_apdu_core::prelude::*;

pub const UID: [u8; 4] = [0x04, 0xA1, 0xB2, 0xC3];
pub const DEFAULT_KEY: [u8; 6] = [0xFF; 6];

/// Reader slots plus card memory, answering the PC/SC storage card APDUs
#[derive(Debug)]
pub struct SimulatedReader {
    /// Every frame received, in order
    pub commands: Vec<Vec<u8>>,
    card_present: bool,
    card_removed: bool,
    slots: [Option<[u8; 6]>; 32],
    sector_keys: HashMap<u16, ([u8; 6], [u8; 6])>,
    blocks: HashMap<u16, [u8; 16]>,
    authenticated: Option<u16>,
}

impl SimulatedReader {
    /// Reader holding a factory-fresh card
    pub fn with_card() -> Self {
        Self {
            commands: Vec::new(),
            card_present: true,
            card_removed: false,
            slots: [None; 32],
            sector_keys: HashMap::new(),
            blocks: HashMap::new(),
            authenticated: None,
        }
    }

    /// Reader with an empty field
    pub fn empty() -> Self {
        Self {
            card_present: false,
            ..Self::with_card()
        }
    }

    /// Set the contents of one block
    pub fn write_block(&mut self, block: u16, data: [u8; 16]) {
        self.blocks.insert(block, data);
    }

    /// Change the keys of one sector
    pub fn set_sector_keys(&mut self, sector: u16, key_a: [u8; 6], key_b: [u8; 6]) {
        self.sector_keys.insert(sector, (key_a, key_b));
    }

    /// Pull the card out mid-session
    pub fn remove_card(&mut self) {
        self.card_removed = true;
    }

    fn answer(&mut self, command: &ApduCommand) -> Vec<u8> {
        if !self.card_present {
            return vec![0x63, 0x00];
        }
        if command.class() != 0xFF {
            return vec![0x6E, 0x00];
        }

        let block = u16::from_be_bytes([command.p1(), command.p2()]);
        match (command.instruction(), command.data()) {
            (0xCA, None) if command.p1() == 0x00 => success(&UID),
            (0x82, Some(key)) => {
                let slot = self.slots.get_mut(usize::from(command.p2()));
                match (<[u8; 6]>::try_from(key), slot) {
                    (Ok(key), Some(slot)) => {
                        *slot = Some(key);
                        vec![0x90, 0x00]
                    }
                    _ => vec![0x63, 0x00],
                }
            }
            (0x86, Some(&[0x01, msb, lsb, key_type, slot])) => {
                let block = u16::from_be_bytes([msb, lsb]);
                let sector = block / 4;
                let (key_a, key_b) = self
                    .sector_keys
                    .get(&sector)
                    .copied()
                    .unwrap_or((DEFAULT_KEY, DEFAULT_KEY));
                let expected = match key_type {
                    0x60 => key_a,
                    0x61 => key_b,
                    _ => return vec![0x6A, 0x86],
                };
                let loaded = self.slots.get(usize::from(slot)).copied().flatten();
                if loaded == Some(expected) {
                    self.authenticated = Some(sector);
                    vec![0x90, 0x00]
                } else {
                    self.authenticated = None;
                    vec![0x63, 0x00]
                }
            }
            (0xB0, None) => {
                if self.authenticated != Some(block / 4) {
                    return vec![0x69, 0x82];
                }
                match command.expected_length() {
                    Some(0 | 16) => {
                        let data = self.blocks.get(&block).copied().unwrap_or([0; 16]);
                        success(&data)
                    }
                    _ => vec![0x67, 0x00],
                }
            }
            _ => vec![0x6D, 0x00],
        }
    }
}

fn success(data: &[u8]) -> Vec<u8> {
    let mut answer = data.to_vec();
    answer.extend_from_slice(&[0x90, 0x00]);
    answer
}

impl CardTransport for SimulatedReader {
    type Error = TransportError;

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        if self.card_removed {
            return Err(TransportError::CardRemoved);
        }
        self.commands.push(command.to_vec());

        let answer = match ApduCommand::from_bytes(command) {
            Ok(command) => self.answer(&command),
            Err(_) => vec![0x67, 0x00],
        };
        Ok(Bytes::from(answer))
    }

    fn is_connected(&self) -> bool {
        !self.card_removed
    }
}
