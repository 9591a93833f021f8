//! Hardware helpers; every test skips when no PC/SC service is reachable

use mifare_apdu_transport_pcsc::{PcscConfig, PcscDeviceManager, PcscTransport};

/// Try to get a device manager on a running PC/SC service
pub fn get_test_manager() -> Option<PcscDeviceManager> {
    PcscDeviceManager::new().ok()
}

/// Name of the first reader holding a card
pub fn get_reader_with_card(manager: &PcscDeviceManager) -> Option<String> {
    let readers = manager.list_readers().ok()?;
    readers
        .into_iter()
        .find(|reader| reader.has_card())
        .map(|reader| reader.name().to_string())
}

/// Try to get a real transport for tests
pub fn get_test_transport() -> Option<PcscTransport> {
    let manager = get_test_manager()?;
    let reader_name = get_reader_with_card(&manager)?;
    manager
        .open_reader_with_config(&reader_name, PcscConfig::default())
        .ok()
}
