//! List available audio devices.

use crate::devices;
use anyhow::Result;

/// Lists all capture and playback devices on the system.
///
/// # Errors
/// - If the audio host cannot enumerate devices
pub fn handle_list_devices() -> Result<()> {
    devices::list_devices()
}
