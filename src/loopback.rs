//! Full-duplex record/playback loop.
//!
//! Opens a capture stream and a playback stream against the same format and
//! copies fixed-size blocks from one to the other in strict lockstep. The
//! observable delay between speaking into the microphone and hearing yourself
//! is the end-to-end latency of the audio stack plus both buffers.
//!
//! There is no programmatic stop; the loop runs until the process is killed.

use crate::devices;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::mpsc;

/// Default buffer sizes in bytes, from the original tool.
pub const DEFAULT_INTERNAL_BUFFER: usize = 40960;
pub const DEFAULT_EXTERNAL_BUFFER: usize = 40960;

const CHANNELS: u16 = 2;
const BYTES_PER_SAMPLE: usize = 2; // 16-bit signed PCM

/// Two states: running (inside [`AudioLoop::run`]) and stopped (never entered;
/// termination is external process kill).
pub struct AudioLoop {
    capture_stream: cpal::Stream,
    playback_stream: cpal::Stream,
    capture_rx: mpsc::Receiver<Vec<i16>>,
    playback_tx: mpsc::SyncSender<Vec<i16>>,
    block_samples: usize,
    pending: Vec<i16>,
}

impl AudioLoop {
    /// Opens capture and playback streams in 16-bit signed stereo at the given
    /// rate.
    ///
    /// `internal_buffer` sizes the device-side stream buffers, `external_buffer`
    /// sizes the block copied per loop iteration; both are in bytes. When
    /// `device` is given, both streams are opened against that device.
    ///
    /// # Errors
    /// - If no suitable capture or playback device is available
    /// - If either stream cannot be built with the requested format
    pub fn new(
        sample_rate: u32,
        internal_buffer: usize,
        external_buffer: usize,
        device: Option<&str>,
    ) -> Result<Self> {
        let host = cpal::default_host();

        let (capture_device, playback_device) = match device {
            Some(name) => (
                devices::find_input_device(&host, name)?,
                devices::find_output_device(&host, name)?,
            ),
            None => devices::suppress_stderr(|| {
                Ok((
                    host.default_input_device()
                        .ok_or_else(|| anyhow!("no capture device available"))?,
                    host.default_output_device()
                        .ok_or_else(|| anyhow!("no playback device available"))?,
                ))
            })?,
        };

        tracing::debug!(
            "capture device: {}",
            capture_device.name().unwrap_or_else(|_| "Unknown".into())
        );
        tracing::debug!(
            "playback device: {}",
            playback_device.name().unwrap_or_else(|_| "Unknown".into())
        );

        let frame_bytes = CHANNELS as usize * BYTES_PER_SAMPLE;
        let internal_frames = (internal_buffer / frame_bytes).max(1) as u32;
        let block_samples = (external_buffer / BYTES_PER_SAMPLE).max(1);

        let config = cpal::StreamConfig {
            channels: CHANNELS,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Fixed(internal_frames),
        };
        tracing::debug!(
            "stream config: {sample_rate} Hz, {CHANNELS} channels, {internal_frames} frames device-side"
        );

        // Capture callbacks hand their data to the copy loop. If the loop
        // falls behind, blocks are dropped rather than stalling the audio
        // thread.
        let (capture_tx, capture_rx) = mpsc::sync_channel::<Vec<i16>>(8);
        let capture_stream = capture_device
            .build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if capture_tx.try_send(data.to_vec()).is_err() {
                        tracing::warn!("copy loop behind, dropping {} samples", data.len());
                    }
                },
                |err| tracing::error!("capture stream error: {err}"),
                None,
            )
            .context("failed to open capture stream")?;

        // A rendezvous-sized channel so the copy loop blocks until playback
        // has taken the previous block: strict lockstep, no internal queue.
        let (playback_tx, playback_rx) = mpsc::sync_channel::<Vec<i16>>(1);
        let mut leftover: VecDeque<i16> = VecDeque::new();
        let playback_stream = playback_device
            .build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    for slot in data.iter_mut() {
                        if leftover.is_empty() {
                            if let Ok(block) = playback_rx.try_recv() {
                                leftover.extend(block);
                            }
                        }
                        *slot = leftover.pop_front().unwrap_or(0);
                    }
                },
                |err| tracing::error!("playback stream error: {err}"),
                None,
            )
            .context("failed to open playback stream")?;

        Ok(Self {
            capture_stream,
            playback_stream,
            capture_rx,
            playback_tx,
            block_samples,
            pending: Vec::new(),
        })
    }

    /// Starts both streams together.
    ///
    /// # Errors
    /// - If either stream refuses to start
    pub fn start(&self) -> Result<()> {
        self.capture_stream
            .play()
            .context("failed to start capture stream")?;
        self.playback_stream
            .play()
            .context("failed to start playback stream")?;
        Ok(())
    }

    /// Runs the copy cycle: block until one full block has been captured, then
    /// hand that exact block to playback. Never returns normally.
    ///
    /// # Errors
    /// - If either stream dies underneath the loop
    pub fn run(&mut self) -> Result<()> {
        loop {
            while self.pending.len() < self.block_samples {
                let chunk = self
                    .capture_rx
                    .recv()
                    .map_err(|_| anyhow!("capture stream closed"))?;
                self.pending.extend(chunk);
            }
            let block: Vec<i16> = self.pending.drain(..self.block_samples).collect();
            tracing::debug!("copying block of {} samples", block.len());
            self.playback_tx
                .send(block)
                .map_err(|_| anyhow!("playback stream closed"))?;
        }
    }
}
