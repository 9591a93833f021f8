use mifare_apdu_transport_pcsc::{PcscDeviceManager, PcscError, PcscReader};

/// Find a reader with a specific name
pub fn find_reader_by_name(
    manager: &PcscDeviceManager,
    reader_name: &str,
) -> Result<PcscReader, Box<dyn std::error::Error>> {
    let readers = manager.list_readers()?;

    readers
        .into_iter()
        .find(|r| r.name() == reader_name)
        .ok_or_else(|| format!("Reader '{}' not found", reader_name).into())
}

/// Find a reader with a card inserted
pub fn find_reader_with_card(
    manager: &PcscDeviceManager,
) -> Result<PcscReader, Box<dyn std::error::Error>> {
    let readers = manager.list_readers()?;

    readers
        .into_iter()
        .find(|r| r.has_card())
        .ok_or_else(|| "No card found in any reader!".into())
}

/// Resolve the reader to talk to: the named one, else the first holding a card
pub fn select_reader(
    manager: &PcscDeviceManager,
    reader_name: Option<&String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let reader = match reader_name {
        Some(name) => find_reader_by_name(manager, name)?,
        None => find_reader_with_card(manager)?,
    };
    Ok(reader.name().to_string())
}

/// Names of every attached reader
pub fn all_reader_names(
    manager: &PcscDeviceManager,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    Ok(manager
        .list_readers()?
        .iter()
        .map(|r| r.name().to_string())
        .collect())
}

/// List all available readers
pub fn list_readers(manager: &PcscDeviceManager) -> Result<(), Box<dyn std::error::Error>> {
    let readers = match manager.list_readers() {
        Ok(readers) => readers,
        Err(PcscError::NoReadersAvailable) => {
            println!("No readers found!");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Available readers:");
    for (i, reader) in readers.iter().enumerate() {
        println!("{}. {} ({})", i + 1, reader.name(), reader.state());
    }

    Ok(())
}
