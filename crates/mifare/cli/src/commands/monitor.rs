use std::io::BufRead;
use std::thread;

use crossbeam_channel::{Receiver, select, unbounded};
use mifare_apdu_transport_pcsc::{
    MonitorConfig, PcscDeviceManager, PcscMonitor, ReaderEvent, StatusSource,
};

use super::card::read_uid;
use crate::utils::display;

enum Input {
    Event(ReaderEvent),
    Line(String),
    Closed,
}

pub fn monitor_command(
    manager: &PcscDeviceManager,
    readers: &[String],
    config: MonitorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("This program will monitor the selected readers and display all status changes.");

    let (monitor, events) = manager.monitor(config);
    for reader in readers {
        println!("Start monitoring for reader {reader}.");
    }
    println!("Press Enter to toggle the monitor, q then Enter to exit.");
    monitor.start(readers.iter().cloned())?;

    let input = spawn_input_reader();
    loop {
        let next = select! {
            recv(events) -> event => event.map_or(Input::Closed, Input::Event),
            recv(input) -> line => line.map_or(Input::Closed, Input::Line),
        };

        match next {
            Input::Event(event) => display_event(manager, &event),
            Input::Line(line) if line.trim().eq_ignore_ascii_case("q") => break,
            Input::Line(_) => toggle(&monitor, readers)?,
            // stdin or the event channel closed
            Input::Closed => break,
        }
    }

    monitor.cancel();
    Ok(())
}

fn toggle<S: StatusSource>(
    monitor: &PcscMonitor<S>,
    readers: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    if monitor.is_watching() {
        monitor.cancel();
        println!("{}", display::info("Monitoring paused. (Enter q to quit)"));
    } else {
        monitor.start(readers.iter().cloned())?;
        println!("{}", display::info("Monitoring started. (Enter q to quit)"));
    }
    Ok(())
}

fn display_event(manager: &PcscDeviceManager, event: &ReaderEvent) {
    println!(">> {event}");

    match event {
        ReaderEvent::Inserted { reader, .. } => {
            if let Err(e) = read_uid(manager, reader) {
                println!("{}", display::warning(&format!("Could not read UID: {e}")));
            }
        }
        ReaderEvent::Error { error, .. } => {
            println!("{}", display::warning(&format!("Monitor error: {error}")));
        }
        ReaderEvent::Initialized { .. } | ReaderEvent::Removed { .. } => {}
    }

    if let Some(state) = event.state() {
        println!("State: {state}\n");
    }
}

/// Forward stdin lines to a channel
fn spawn_input_reader() -> Receiver<String> {
    let (sender, receiver) = unbounded();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}
