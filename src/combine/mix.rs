//! Fan-in mixing combinator parameterized by a clipping strategy.
//!
//! Each pull reads one sample from every still-live source and sums them.
//! Sources that end early contribute silence for the rest of the stream, so
//! the combined stream is as long as the longest source.

use crate::format::AudioFormat;
use crate::source::{InputSource, Sample};
use anyhow::Result;

/// How summed samples are accumulated and folded back into the output range.
pub trait MixPolicy {
    type Sample: Sample;
    type Acc: Copy;

    fn zero(&self) -> Self::Acc;
    fn add(&self, acc: Self::Acc, sample: Self::Sample) -> Self::Acc;
    fn finish(&self, acc: Self::Acc) -> Self::Sample;
}

/// Integer mixing: sums in i64 and saturates at the format's representable
/// bounds to avoid wraparound artifacts.
pub struct SaturatingMix {
    min: i64,
    max: i64,
}

impl SaturatingMix {
    pub fn for_format(format: &AudioFormat) -> Self {
        let (min, max) = format.sample_bounds();
        Self { min, max }
    }
}

impl MixPolicy for SaturatingMix {
    type Sample = i32;
    type Acc = i64;

    fn zero(&self) -> i64 {
        0
    }

    fn add(&self, acc: i64, sample: i32) -> i64 {
        acc + i64::from(sample)
    }

    fn finish(&self, acc: i64) -> i32 {
        acc.clamp(self.min, self.max) as i32
    }
}

/// Float mixing: unscaled accumulation, no clipping. Folding the sum back into
/// the output range is left to the writer.
pub struct FloatMix;

impl MixPolicy for FloatMix {
    type Sample = f32;
    type Acc = f32;

    fn zero(&self) -> f32 {
        0.0
    }

    fn add(&self, acc: f32, sample: f32) -> f32 {
        acc + sample
    }

    fn finish(&self, acc: f32) -> f32 {
        acc
    }
}

/// Sums N sources into one stream under the given policy.
pub struct MixingSource<P: MixPolicy> {
    policy: P,
    sources: Vec<InputSource>,
    exhausted: Vec<bool>,
}

impl<P: MixPolicy> MixingSource<P> {
    pub fn new(policy: P, sources: Vec<InputSource>) -> Self {
        let exhausted = vec![false; sources.len()];
        Self {
            policy,
            sources,
            exhausted,
        }
    }

    /// Next mixed sample, or `None` once every source has signaled
    /// end-of-data.
    pub fn next(&mut self) -> Option<Result<P::Sample>> {
        if self.exhausted.iter().all(|&done| done) {
            return None;
        }

        let mut acc = self.policy.zero();
        let mut live = 0usize;
        for (index, source) in self.sources.iter_mut().enumerate() {
            if self.exhausted[index] {
                continue;
            }
            match P::Sample::read(source) {
                Some(Ok(sample)) => {
                    acc = self.policy.add(acc, sample);
                    live += 1;
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    tracing::debug!("source ended: {}", source.path().display());
                    self.exhausted[index] = true;
                }
            }
        }

        if live == 0 {
            // Every remaining source ended on this step.
            return None;
        }
        Some(Ok(self.policy.finish(acc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{AudioFormat, SampleFormat};
    use std::path::PathBuf;

    fn temp_wav(name: &str, samples: &[i16]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("audiocat_mix_{}_{}.wav", std::process::id(), name));
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    fn fmt_16bit() -> AudioFormat {
        AudioFormat {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    fn open_all(paths: &[&PathBuf]) -> Vec<InputSource> {
        paths.iter().map(|p| InputSource::open(p).unwrap()).collect()
    }

    #[test]
    fn test_integer_mix_sums_and_clips() {
        let a = temp_wav("clip_a", &[1000, 20000, -20000]);
        let b = temp_wav("clip_b", &[2000, 20000, -20000]);

        let mut mix = MixingSource::new(SaturatingMix::for_format(&fmt_16bit()), open_all(&[&a, &b]));

        assert_eq!(mix.next().unwrap().unwrap(), 3000);
        // 40000 saturates at the 16-bit bounds instead of wrapping.
        assert_eq!(mix.next().unwrap().unwrap(), 32767);
        assert_eq!(mix.next().unwrap().unwrap(), -32768);
        assert!(mix.next().is_none());

        for p in [a, b] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_short_sources_pad_with_silence() {
        let a = temp_wav("pad_a", &[5, 5, 5, 5]);
        let b = temp_wav("pad_b", &[10]);

        let mut mix = MixingSource::new(SaturatingMix::for_format(&fmt_16bit()), open_all(&[&a, &b]));

        let mut out = Vec::new();
        while let Some(sample) = mix.next() {
            out.push(sample.unwrap());
        }
        // Output is as long as the longest input, short one contributes zeros.
        assert_eq!(out, vec![15, 5, 5, 5]);

        for p in [a, b] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_float_mix_does_not_clip() {
        let a = temp_wav("float_a", &[29491]); // ~0.9
        let b = temp_wav("float_b", &[29491, 100]);

        let mut mix = MixingSource::new(FloatMix, open_all(&[&a, &b]));

        let first = mix.next().unwrap().unwrap();
        assert!((first - 1.8).abs() < 1e-3);

        let second = mix.next().unwrap().unwrap();
        assert!((second - 100.0 / 32768.0).abs() < 1e-6);
        assert!(mix.next().is_none());

        for p in [a, b] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_all_sources_ending_together() {
        let a = temp_wav("end_a", &[1, 2]);
        let b = temp_wav("end_b", &[3, 4]);

        let mut mix = MixingSource::new(SaturatingMix::for_format(&fmt_16bit()), open_all(&[&a, &b]));

        assert_eq!(mix.next().unwrap().unwrap(), 4);
        assert_eq!(mix.next().unwrap().unwrap(), 6);
        assert!(mix.next().is_none());
        assert!(mix.next().is_none());

        for p in [a, b] {
            std::fs::remove_file(p).unwrap();
        }
    }
}
