//! Run the capture-to-playback copy loop.

use crate::loopback::AudioLoop;
use anyhow::Result;

/// Builds and runs the loopback. Never returns normally; the loop runs until
/// the process is killed.
///
/// # Errors
/// - If the devices or streams cannot be opened
/// - If a stream dies while the loop is running
pub fn handle_loopback(
    sample_rate: u32,
    internal_buffer: usize,
    external_buffer: usize,
    device: Option<&str>,
) -> Result<()> {
    let mut audio_loop = AudioLoop::new(sample_rate, internal_buffer, external_buffer, device)?;
    audio_loop.start()?;
    tracing::debug!("loopback running, kill the process to stop");
    audio_loop.run()
}
