use std::io::{self, Write};

use crate::recognition::domain::transcript::RecognitionResult;
use crate::shared::constants::REPORT_FLUSH_EVERY;

/// Prints the best alternative of each result as space-separated words.
///
/// Each word is followed by one space. The line buffer is flushed whenever the
/// zero-based word index is a multiple of `flush_every`, and once more after
/// the last word of every alternative, so groups are index-driven rather than
/// aligned to phrases or timing.
pub struct WordReporter<W: Write> {
    out: W,
    flush_every: usize,
}

impl<W: Write> WordReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            flush_every: REPORT_FLUSH_EVERY,
        }
    }

    /// Write all results. Returns the number of lines written.
    pub fn report(&mut self, results: &[RecognitionResult]) -> io::Result<usize> {
        let mut written = 0;
        for result in results {
            let Some(best) = result.best_alternative() else {
                log::warn!("Skipping recognition result with no alternatives");
                continue;
            };
            let lines = group_words(best.words.iter().map(|w| w.word.as_str()), self.flush_every);
            for line in &lines {
                writeln!(self.out, "{line}")?;
            }
            written += lines.len();
        }
        self.out.flush()?;
        Ok(written)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Group words into the lines the reporter prints for one alternative.
///
/// The final (possibly empty) remainder is always returned as the last line.
pub fn group_words<'a>(words: impl IntoIterator<Item = &'a str>, flush_every: usize) -> Vec<String> {
    let flush_every = flush_every.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for (i, word) in words.into_iter().enumerate() {
        line.push_str(word);
        line.push(' ');
        if i % flush_every == 0 {
            lines.push(std::mem::take(&mut line));
        }
    }
    lines.push(line);
    lines
}
