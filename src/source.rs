//! Input sources: one opened WAV file, consumed once, sequentially.

use crate::format::{AudioFormat, SampleFormat};
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

type WavSamples<S> = hound::WavIntoSamples<BufReader<File>, S>;

/// The decoded sample stream of one file, matching its container encoding.
enum SampleStream {
    Int(WavSamples<i32>),
    Float(WavSamples<f32>),
}

/// An ordered sequence of raw audio samples read from one file.
pub struct InputSource {
    path: PathBuf,
    format: AudioFormat,
    samples: SampleStream,
}

impl InputSource {
    /// Opens a WAV file and prepares its sample stream.
    ///
    /// # Errors
    /// - If the file cannot be opened or is not a valid WAV file
    pub fn open(path: &Path) -> Result<Self> {
        let reader = hound::WavReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let format = AudioFormat::from_spec(reader.spec());

        let samples = match format.sample_format {
            SampleFormat::Int => SampleStream::Int(reader.into_samples()),
            SampleFormat::Float => SampleStream::Float(reader.into_samples()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            format,
            samples,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Next sample as a signed integer, sign-extended to i32.
    ///
    /// Returns `None` at end-of-data. Float-encoded files cannot be read
    /// through the integer pipeline; that surfaces as an error on first read.
    pub fn next_int(&mut self) -> Option<Result<i32>> {
        match &mut self.samples {
            SampleStream::Int(iter) => iter.next().map(|r| {
                r.with_context(|| format!("failed to read {}", self.path.display()))
            }),
            SampleStream::Float(_) => Some(Err(anyhow!(
                "{} contains float samples, cannot process as integer PCM",
                self.path.display()
            ))),
        }
    }

    /// Next sample as f32. Integer samples are normalized by 2^(bits-1).
    pub fn next_float(&mut self) -> Option<Result<f32>> {
        match &mut self.samples {
            SampleStream::Int(iter) => {
                let scale = self.format.float_scale();
                iter.next().map(|r| {
                    r.map(|s| s as f32 / scale)
                        .with_context(|| format!("failed to read {}", self.path.display()))
                })
            }
            SampleStream::Float(iter) => iter.next().map(|r| {
                r.with_context(|| format!("failed to read {}", self.path.display()))
            }),
        }
    }
}

/// A PCM sample type the combinators can pull from an input source.
pub trait Sample: Copy {
    const SILENCE: Self;

    fn read(source: &mut InputSource) -> Option<Result<Self>>;
}

impl Sample for i32 {
    const SILENCE: Self = 0;

    fn read(source: &mut InputSource) -> Option<Result<Self>> {
        source.next_int()
    }
}

impl Sample for f32 {
    const SILENCE: Self = 0.0;

    fn read(source: &mut InputSource) -> Option<Result<Self>> {
        source.next_float()
    }
}
