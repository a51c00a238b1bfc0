//! Shared library for the audiocat and audioloop command-line tools.
//!
//! `audiocat` concatenates or mixes WAV files into a single output file.
//! `audioloop` copies audio from a capture device to a playback device in a
//! tight loop, useful for measuring end-to-end latency.

pub mod combine;
pub mod commands;
pub mod devices;
pub mod format;
pub mod logging;
pub mod loopback;
pub mod source;
pub mod writer;
