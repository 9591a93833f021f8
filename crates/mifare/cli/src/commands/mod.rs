mod card;
mod monitor;

pub use card::{ReadArgs, read_command, uid_command};
pub use monitor::monitor_command;
