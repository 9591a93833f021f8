//! PC/SC transport implementation for APDU operations
//!
//! This crate provides an implementation of the `CardTransport` trait from
//! `mifare-apdu-core` using the PC/SC API, plus a background monitor that
//! reports card insertion and removal.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mifare_apdu_core::{CardExecutor, Command};
//! use mifare_apdu_transport_pcsc::{MonitorConfig, PcscDeviceManager};
//!
//! let manager = PcscDeviceManager::new()?;
//!
//! let readers = manager.list_readers()?;
//! let reader = &readers[0];
//! println!("Connecting to reader: {}", reader.name());
//!
//! let transport = manager.open_reader(reader.name())?;
//! let mut executor = CardExecutor::new(transport);
//! let response = executor.transmit(&Command::VendorGetData)?;
//! println!("Response: {:?}", response);
//!
//! let (monitor, events) = manager.monitor(MonitorConfig::default());
//! monitor.start([reader.name()])?;
//! for event in events.iter().take(1) {
//!     println!("{event}");
//! }
//! monitor.cancel();
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

// Core modules
mod config;
mod error;
pub mod event;
mod manager;
pub mod monitor;
mod reader;
mod transport;

// Public exports
pub use config::{MonitorConfig, PcscConfig, ShareMode};
pub use error::PcscError;
pub use event::{CardState, EventKind, Presence, ReaderEvent, ReaderEventReceiver};
pub use manager::PcscDeviceManager;
pub use monitor::{PcscMonitor, PcscStatusSource, ReaderStatus, StatusSource};
pub use reader::PcscReader;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocols, State};
