//! Concatenating combinator: a cursor over an ordered list of sources.

use crate::source::{InputSource, Sample};
use anyhow::Result;

/// Presents an ordered list of sources as one uninterrupted stream.
///
/// Pulls from the active source and advances to the next one when it signals
/// end-of-data, so the caller sees a stream whose total length is the sum of
/// all source lengths. All sources are assumed to share the session format;
/// converting between formats is future work, not done here.
pub struct SequenceSource {
    sources: Vec<InputSource>,
    index: usize,
}

impl SequenceSource {
    pub fn new(sources: Vec<InputSource>) -> Self {
        Self { sources, index: 0 }
    }

    /// Next sample of the combined stream, or `None` once every source is
    /// exhausted.
    pub fn next<S: Sample>(&mut self) -> Option<Result<S>> {
        while let Some(source) = self.sources.get_mut(self.index) {
            match S::read(source) {
                Some(sample) => return Some(sample),
                None => {
                    tracing::debug!(
                        "source exhausted, advancing past {}",
                        source.path().display()
                    );
                    self.index += 1;
                }
            }
        }
        None
    }
}
