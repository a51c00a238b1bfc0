//! Audio format description and session format negotiation.
//!
//! The first input file of a run fixes the canonical format. Every other input
//! is compared against it field by field; mismatches are logged but never
//! corrected (no resampling, no bit-depth conversion).

use crate::source::InputSource;
use anyhow::{anyhow, Result};
use std::fmt;

/// How samples are encoded in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed integer PCM.
    Int,
    /// IEEE float PCM.
    Float,
}

/// The PCM format shared by a set of streams.
///
/// WAV data is always little-endian and integer samples are signed (8-bit
/// samples are stored offset, which hound handles), so byte order and
/// signedness are implied by the container and bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
}

impl AudioFormat {
    pub fn from_spec(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: match spec.sample_format {
                hound::SampleFormat::Int => SampleFormat::Int,
                hound::SampleFormat::Float => SampleFormat::Float,
            },
        }
    }

    pub fn to_spec(self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: match self.sample_format {
                SampleFormat::Int => hound::SampleFormat::Int,
                SampleFormat::Float => hound::SampleFormat::Float,
            },
        }
    }

    /// Exact field-wise equality. No tolerance on the sample rate.
    pub fn matches(&self, other: &AudioFormat) -> bool {
        self == other
    }

    /// Representable sample range for the integer bit depth.
    ///
    /// Computed in i64 so a 32-bit depth does not overflow.
    pub fn sample_bounds(&self) -> (i64, i64) {
        let half = 1i64 << (self.bits_per_sample - 1);
        (-half, half - 1)
    }

    /// Scale factor between normalized float samples and this bit depth.
    pub fn float_scale(&self) -> f32 {
        (1i64 << (self.bits_per_sample - 1)) as f32
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = match self.sample_format {
            SampleFormat::Int => "int",
            SampleFormat::Float => "float",
        };
        write!(
            f,
            "{} Hz, {}-bit {}, {} channel(s)",
            self.sample_rate, self.bits_per_sample, encoding, self.channels
        )
    }
}

/// Adopts the first source's format as the session format and checks the rest.
///
/// Mismatches are logged as warnings and processing continues with potentially
/// incorrect output; converting mismatched inputs is deliberately not done.
///
/// # Errors
/// - If the source list is empty
pub fn negotiate(sources: &[InputSource]) -> Result<AudioFormat> {
    let first = sources
        .first()
        .ok_or_else(|| anyhow!("no input files"))?;
    let canonical = first.format();
    tracing::debug!("session format: {canonical}");

    for source in &sources[1..] {
        if !canonical.matches(&source.format()) {
            tracing::warn!("audio formats don't match: {}", source.path().display());
            tracing::warn!("master format: {canonical}");
            tracing::warn!("this format: {}", source.format());
        }
    }

    Ok(canonical)
}
