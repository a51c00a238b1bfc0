//! Drains a combined stream into a single WAV container.

use crate::format::{AudioFormat, SampleFormat};
use anyhow::{Context, Result};
use std::path::Path;

/// Writes integer samples until the stream ends. Returns the sample count.
///
/// # Errors
/// - If the output file cannot be created or written
/// - If the stream yields a read error
pub fn write_int_samples<F>(path: &Path, format: AudioFormat, mut next: F) -> Result<u64>
where
    F: FnMut() -> Option<Result<i32>>,
{
    let mut writer = hound::WavWriter::create(path, format.to_spec())
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut count = 0u64;
    while let Some(sample) = next() {
        writer
            .write_sample(sample?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        count += 1;
    }

    writer
        .finalize()
        .with_context(|| format!("failed to finalize {}", path.display()))?;
    Ok(count)
}

/// Writes float samples until the stream ends. Returns the sample count.
///
/// When the session format is integer PCM, samples are scaled by 2^(bits-1)
/// and clamped to the representable range here; the mixing combinator itself
/// never clips float sums.
///
/// # Errors
/// - If the output file cannot be created or written
/// - If the stream yields a read error
pub fn write_float_samples<F>(path: &Path, format: AudioFormat, mut next: F) -> Result<u64>
where
    F: FnMut() -> Option<Result<f32>>,
{
    let mut writer = hound::WavWriter::create(path, format.to_spec())
        .with_context(|| format!("failed to create {}", path.display()))?;

    let scale = format.float_scale();
    let (min, max) = format.sample_bounds();

    let mut count = 0u64;
    while let Some(sample) = next() {
        let sample = sample?;
        match format.sample_format {
            SampleFormat::Float => writer.write_sample(sample),
            SampleFormat::Int => {
                let scaled = (sample * scale).round() as i64;
                writer.write_sample(scaled.clamp(min, max) as i32)
            }
        }
        .with_context(|| format!("failed to write {}", path.display()))?;
        count += 1;
    }

    writer
        .finalize()
        .with_context(|| format!("failed to finalize {}", path.display()))?;
    Ok(count)
}
