//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements   | Connects to                 |
//! |---------------|--------------|-----------------------------|
//! | `sim`         | BlockQuery   | In-memory simulated grid    |
//! |               | DevicePort   |                             |
//! | `log_sink`    | EventSink    | `log` facade                |
//! | `config_file` | ConfigPort   | JSON file on disk           |
//!
//! The tick scheduler lives in [`crate::scheduler`].

pub mod config_file;
pub mod log_sink;
pub mod sim;
