//! Command handlers for the audiocat and audioloop binaries.
//!
//! # Commands
//! - `combine`: concatenate or mix input files into one output file
//! - `loopback`: capture-to-playback copy loop
//! - `list_devices`: list available capture and playback devices

pub mod combine;
pub mod list_devices;
pub mod loopback;

pub use combine::{handle_combine, Mode};
pub use list_devices::handle_list_devices;
pub use loopback::handle_loopback;
