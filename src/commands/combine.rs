//! Concatenate or mix input files into a single output file.

use crate::combine::{FloatMix, MixingSource, SaturatingMix, SequenceSource};
use crate::format::{self, SampleFormat};
use crate::source::InputSource;
use crate::writer;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// What to do with the input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Place inputs end-to-end in argument order.
    Concat,
    /// Sample-wise integer sum with saturating clipping.
    Mix,
    /// Sample-wise float sum, no clipping.
    FloatMix,
}

/// Opens all inputs, negotiates the session format, and drains the requested
/// combinator into the output file.
///
/// All inputs are opened before the output is created, so an unreadable input
/// never leaves a partial output behind. A failure while draining removes the
/// half-written file.
///
/// # Errors
/// - If any input cannot be opened or decoded
/// - If the output cannot be created or written
pub fn handle_combine(mode: Mode, output: &Path, inputs: &[PathBuf]) -> Result<()> {
    let mut sources = Vec::with_capacity(inputs.len());
    for path in inputs {
        let source = InputSource::open(path)?;
        tracing::debug!("opened {} ({})", path.display(), source.format());
        sources.push(source);
    }

    let session_format = format::negotiate(&sources)?;

    let result = match mode {
        Mode::Concat => {
            let mut stream = SequenceSource::new(sources);
            match session_format.sample_format {
                SampleFormat::Int => {
                    writer::write_int_samples(output, session_format, || stream.next::<i32>())
                }
                SampleFormat::Float => {
                    writer::write_float_samples(output, session_format, || stream.next::<f32>())
                }
            }
        }
        Mode::Mix => {
            let policy = SaturatingMix::for_format(&session_format);
            let mut stream = MixingSource::new(policy, sources);
            writer::write_int_samples(output, session_format, || stream.next())
        }
        Mode::FloatMix => {
            let mut stream = MixingSource::new(FloatMix, sources);
            writer::write_float_samples(output, session_format, || stream.next())
        }
    };

    match result {
        Ok(samples) => {
            tracing::debug!(
                "wrote {} samples ({} frames) to {}",
                samples,
                samples / u64::from(session_format.channels),
                output.display()
            );
            Ok(())
        }
        Err(e) => {
            // Fail-fast: never leave a truncated output file around.
            let _ = std::fs::remove_file(output);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::AudioFormat;

    fn temp_wav(name: &str, samples: &[i16], sample_rate: u32) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "audiocat_cmd_{}_{}.wav",
            std::process::id(),
            name
        ));
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
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

    fn temp_float_wav(name: &str, samples: &[f32]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "audiocat_cmd_{}_{}.wav",
            std::process::id(),
            name
        ));
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    fn temp_out(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "audiocat_cmd_out_{}_{}.wav",
            std::process::id(),
            name
        ))
    }

    fn read_all(path: &Path) -> Vec<i32> {
        hound::WavReader::open(path)
            .unwrap()
            .into_samples::<i32>()
            .map(|s| s.unwrap())
            .collect()
    }

    #[test]
    fn test_concat_output_is_inputs_in_order() {
        let a = temp_wav("ca", &[1, 2], 8000);
        let b = temp_wav("cb", &[3], 8000);
        let out = temp_out("concat");

        handle_combine(Mode::Concat, &out, &[a.clone(), b.clone()]).unwrap();

        assert_eq!(read_all(&out), vec![1, 2, 3]);

        for p in [a, b, out] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_single_file_round_trips_byte_for_byte() {
        let a = temp_wav("rt", &[9, -9, 12345, -12345], 44100);
        let out = temp_out("rt");

        handle_combine(Mode::Concat, &out, &[a.clone()]).unwrap();

        assert_eq!(read_all(&out), read_all(&a));
        let in_spec = hound::WavReader::open(&a).unwrap().spec();
        let out_spec = hound::WavReader::open(&out).unwrap().spec();
        assert_eq!(
            AudioFormat::from_spec(in_spec),
            AudioFormat::from_spec(out_spec)
        );

        for p in [a, out] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_mix_clips_to_format_bounds() {
        let a = temp_wav("ma", &[30000, -30000, 10], 8000);
        let b = temp_wav("mb", &[30000, -30000], 8000);
        let out = temp_out("mix");

        handle_combine(Mode::Mix, &out, &[a.clone(), b.clone()]).unwrap();

        assert_eq!(read_all(&out), vec![32767, -32768, 10]);

        for p in [a, b, out] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_float_mix_length_is_longest_input() {
        let a = temp_wav("fa", &[100; 5], 8000);
        let b = temp_wav("fb", &[100; 9], 8000);
        let out = temp_out("fmix");

        handle_combine(Mode::FloatMix, &out, &[a.clone(), b.clone()]).unwrap();

        assert_eq!(read_all(&out).len(), 9);

        for p in [a, b, out] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_mismatched_formats_warn_but_proceed() {
        let a = temp_wav("wa", &[1, 2], 8000);
        let b = temp_wav("wb", &[3, 4], 44100);
        let out = temp_out("warn");

        // First file fixes the canonical format; the mismatch only warns.
        handle_combine(Mode::Concat, &out, &[a.clone(), b.clone()]).unwrap();

        assert_eq!(read_all(&out), vec![1, 2, 3, 4]);
        assert_eq!(hound::WavReader::open(&out).unwrap().spec().sample_rate, 8000);

        for p in [a, b, out] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_unreadable_input_is_fatal_with_no_output() {
        let a = temp_wav("fatal", &[1], 8000);
        let out = temp_out("fatal");
        let missing = PathBuf::from("/nonexistent/missing.wav");

        assert!(handle_combine(Mode::Concat, &out, &[a.clone(), missing]).is_err());
        assert!(!out.exists());

        std::fs::remove_file(a).unwrap();
    }

    #[test]
    fn test_float_input_in_integer_session_fails_fast() {
        let a = temp_wav("ints", &[1, 2, 3], 8000);
        let b = temp_float_wav("floats", &[0.25, 0.25]);
        let out = temp_out("intfloat");

        // First file fixes an integer session; the float input cannot feed the
        // integer pipeline and must abort on first read, leaving no output.
        let result = handle_combine(Mode::Mix, &out, &[a.clone(), b.clone()]);
        assert!(result.is_err());
        assert!(!out.exists());

        for p in [a, b] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn test_zero_inputs_rejected() {
        let out = temp_out("empty");
        assert!(handle_combine(Mode::Concat, &out, &[]).is_err());
        assert!(!out.exists());
    }
}
