//! Concatenate or mix audio files into a single WAV file.
//!
//! ```text
//! audiocat -h
//! audiocat [-D] -c|-m|-f -o <outputfile> <inputfile> ...
//! ```

use audiocat::commands::{self, Mode};
use audiocat::logging;
use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

/// Reads multiple audio files and writes a single WAV file, either containing
/// the data of all inputs in order (concatenation) or a mixdown of them.
#[derive(Parser)]
#[command(name = "audiocat", version)]
#[command(about = "Concatenate or mix audio files into a single WAV file")]
struct Cli {
    /// Select concatenation mode
    #[arg(short = 'c', overrides_with_all = ["mix", "float_mix"])]
    concat: bool,

    /// Select integer mixing mode (sums are clipped to the sample range)
    #[arg(short = 'm', overrides_with_all = ["concat", "float_mix"])]
    mix: bool,

    /// Select float mixing mode (sums are not clipped)
    #[arg(short = 'f', overrides_with_all = ["concat", "mix"])]
    float_mix: bool,

    /// Output file
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'D')]
    debug: bool,

    /// Input files
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,
}

impl Cli {
    /// The last mode flag parsed wins; supplying several is not diagnosed.
    fn mode(&self) -> Option<Mode> {
        if self.concat {
            Some(Mode::Concat)
        } else if self.mix {
            Some(Mode::Mix)
        } else if self.float_mix {
            Some(Mode::FloatMix)
        } else {
            None
        }
    }
}

fn print_usage_and_exit(message: &str) -> ! {
    println!("{message}");
    let mut cmd = Cli::command();
    let _ = cmd.write_help(&mut io::stdout());
    let _ = io::stdout().flush();
    process::exit(1);
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

    if let Err(e) = logging::init_logging(cli.debug) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }

    let Some(mode) = cli.mode() else {
        print_usage_and_exit("you have to specify a mode (-c, -m or -f).");
    };
    let Some(output) = cli.output.as_deref() else {
        print_usage_and_exit("you have to specify an output file (using -o <file>).");
    };
    if cli.inputs.is_empty() {
        print_usage_and_exit("no input files!");
    }

    if let Err(e) = commands::handle_combine(mode, output, &cli.inputs) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_mode_flag_wins() {
        let cli = Cli::try_parse_from(["audiocat", "-c", "-m", "-o", "out.wav", "in.wav"]).unwrap();
        assert_eq!(cli.mode(), Some(Mode::Mix));

        let cli = Cli::try_parse_from(["audiocat", "-m", "-f", "-c", "-o", "out.wav", "in.wav"])
            .unwrap();
        assert_eq!(cli.mode(), Some(Mode::Concat));
    }

    #[test]
    fn test_missing_mode_is_none() {
        let cli = Cli::try_parse_from(["audiocat", "-o", "out.wav", "in.wav"]).unwrap();
        assert_eq!(cli.mode(), None);
    }

    #[test]
    fn test_inputs_are_positional_and_ordered() {
        let cli = Cli::try_parse_from(["audiocat", "-c", "-o", "out.wav", "a.wav", "b.wav"])
            .unwrap();
        assert_eq!(
            cli.inputs,
            vec![PathBuf::from("a.wav"), PathBuf::from("b.wav")]
        );
        assert_eq!(cli.output, Some(PathBuf::from("out.wav")));
    }

    #[test]
    fn test_help_flag_is_a_parse_error() {
        assert!(Cli::try_parse_from(["audiocat", "-h"]).is_err());
    }
}
