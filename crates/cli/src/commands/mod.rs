pub mod config;
pub mod lookup;
pub mod providers;
pub mod utils;

pub use config::{handle_config_command, ConfigCommands};
pub use lookup::{run_lookups, LookupOptions};
pub use providers::list_providers;
