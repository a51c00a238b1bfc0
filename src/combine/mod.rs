//! Stream combinators that present N input sources as one logical stream.
//!
//! - [`sequence::SequenceSource`] plays sources back to back (concatenation).
//! - [`mix::MixingSource`] sums sources sample by sample, parameterized by a
//!   clipping strategy.

pub mod mix;
pub mod sequence;

pub use mix::{FloatMix, MixPolicy, MixingSource, SaturatingMix};
pub use sequence::SequenceSource;
