//! Record audio and play it back immediately.
//!
//! Useful for experiencing the latency of the audio stack: speak into the
//! microphone and wait until you hear yourself in the speakers. Change the
//! buffer sizes with `-e` and `-i` and the delay changes too.
//!
//! ```text
//! audioloop -h
//! audioloop -l
//! audioloop [-D] [-M <device>] [-r <rate>] [-e <bufsize>] [-i <bufsize>]
//! ```
//!
//! There is no way to stop the loop besides killing the process.

use audiocat::commands;
use audiocat::logging;
use audiocat::loopback::{DEFAULT_EXTERNAL_BUFFER, DEFAULT_INTERNAL_BUFFER};
use clap::Parser;
use std::process;

/// Copies audio from a capture device to a playback device until killed.
#[derive(Parser)]
#[command(name = "audioloop", version)]
#[command(about = "Copy captured audio straight back to the playback device")]
struct Cli {
    /// List available audio devices and exit
    #[arg(short = 'l')]
    list: bool,

    /// Device to use for capture and playback (name or index)
    #[arg(short = 'M', value_name = "NAME")]
    device: Option<String>,

    /// Application-side buffer size in bytes
    #[arg(short = 'e', value_name = "BYTES", default_value_t = DEFAULT_EXTERNAL_BUFFER)]
    external_buffer: usize,

    /// Device-side buffer size in bytes
    #[arg(short = 'i', value_name = "BYTES", default_value_t = DEFAULT_INTERNAL_BUFFER)]
    internal_buffer: usize,

    /// Sample rate in Hz
    #[arg(short = 'r', value_name = "RATE", default_value_t = 44100)]
    sample_rate: u32,

    /// Enable debug logging
    #[arg(short = 'D')]
    debug: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Covers -h as well: usage always exits with status 1.
            let _ = e.print();
            process::exit(1);
        }
    };

    if cli.list {
        if let Err(e) = commands::handle_list_devices() {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
        return;
    }

    if let Err(e) = logging::init_logging(cli.debug) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }

    if let Err(e) = commands::handle_loopback(
        cli.sample_rate,
        cli.internal_buffer,
        cli.external_buffer,
        cli.device.as_deref(),
    ) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["audioloop"]).unwrap();
        assert_eq!(cli.sample_rate, 44100);
        assert_eq!(cli.external_buffer, 40960);
        assert_eq!(cli.internal_buffer, 40960);
        assert!(cli.device.is_none());
        assert!(!cli.list);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "audioloop", "-M", "pipewire", "-r", "48000", "-e", "8192", "-i", "4096", "-D",
        ])
        .unwrap();
        assert_eq!(cli.device.as_deref(), Some("pipewire"));
        assert_eq!(cli.sample_rate, 48000);
        assert_eq!(cli.external_buffer, 8192);
        assert_eq!(cli.internal_buffer, 4096);
        assert!(cli.debug);
    }
}
