//! Audio device enumeration and selection.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Finds a capture device by numeric index or exact name.
///
/// # Errors
/// - If devices cannot be enumerated
/// - If no capture device matches
pub fn find_input_device(host: &cpal::Host, spec: &str) -> Result<cpal::Device> {
    let devices: Vec<cpal::Device> = suppress_stderr(|| {
        Ok(host
            .input_devices()
            .map_err(|e| anyhow!("failed to enumerate capture devices: {e}"))?
            .collect())
    })?;
    match_device(devices, spec, "capture")
}

/// Finds a playback device by numeric index or exact name.
///
/// # Errors
/// - If devices cannot be enumerated
/// - If no playback device matches
pub fn find_output_device(host: &cpal::Host, spec: &str) -> Result<cpal::Device> {
    let devices: Vec<cpal::Device> = suppress_stderr(|| {
        Ok(host
            .output_devices()
            .map_err(|e| anyhow!("failed to enumerate playback devices: {e}"))?
            .collect())
    })?;
    match_device(devices, spec, "playback")
}

fn match_device(devices: Vec<cpal::Device>, spec: &str, direction: &str) -> Result<cpal::Device> {
    // Numeric specs select by position in the enumeration order.
    if let Ok(index) = spec.parse::<usize>() {
        let count = devices.len();
        return devices.into_iter().nth(index).ok_or_else(|| {
            anyhow!(
                "{direction} device index {index} is out of range (0-{})",
                count.saturating_sub(1)
            )
        });
    }

    for device in devices {
        if let Ok(name) = device.name() {
            if name == spec {
                return Ok(device);
            }
        }
    }

    Err(anyhow!(
        "{direction} device '{spec}' not found, use 'audioloop -l' to list available devices"
    ))
}

/// Prints the available capture and playback devices with their default
/// configurations.
///
/// # Errors
/// - If the audio host cannot enumerate devices
pub fn list_devices() -> Result<()> {
    let host = cpal::default_host();

    let (inputs, outputs, default_input, default_output) = suppress_stderr(|| {
        let inputs: Vec<cpal::Device> = host
            .input_devices()
            .map_err(|e| anyhow!("failed to enumerate capture devices: {e}"))?
            .filter(|d| d.name().is_ok())
            .collect();
        let outputs: Vec<cpal::Device> = host
            .output_devices()
            .map_err(|e| anyhow!("failed to enumerate playback devices: {e}"))?
            .filter(|d| d.name().is_ok())
            .collect();
        let default_input = host.default_input_device().and_then(|d| d.name().ok());
        let default_output = host.default_output_device().and_then(|d| d.name().ok());
        Ok((inputs, outputs, default_input, default_output))
    })?;

    if inputs.is_empty() && outputs.is_empty() {
        println!("No audio devices found on this system.");
        return Ok(());
    }

    println!("Available capture devices:");
    print_device_table(&inputs, default_input.as_deref(), true);
    println!();
    println!("Available playback devices:");
    print_device_table(&outputs, default_output.as_deref(), false);

    Ok(())
}

fn print_device_table(devices: &[cpal::Device], default_name: Option<&str>, input: bool) {
    for (index, device) in devices.iter().enumerate() {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let default_marker = if Some(name.as_str()) == default_name {
            " [DEFAULT]"
        } else {
            ""
        };

        let config = if input {
            device
                .default_input_config()
                .map(|c| format!("{} Hz, {} channel(s)", c.sample_rate().0, c.channels()))
        } else {
            device
                .default_output_config()
                .map(|c| format!("{} Hz, {} channel(s)", c.sample_rate().0, c.channels()))
        };

        match config {
            Ok(config) => println!("  {index}: {name}{default_marker} ({config})"),
            Err(_) => println!("  {index}: {name}{default_marker} (configuration unavailable)"),
        }
    }
    if devices.is_empty() {
        println!("  (none)");
    }
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings
/// on Linux. On other platforms this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
pub(crate) fn suppress_stderr<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("failed to duplicate stderr"));
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed.
#[cfg(not(target_os = "linux"))]
pub(crate) fn suppress_stderr<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}
