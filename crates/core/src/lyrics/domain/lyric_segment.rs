use serde::Deserialize;

/// One record of a lyric resource. Only `text` is read; other keys are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LyricSegment {
    pub text: String,
}

impl LyricSegment {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// Lines of `text`, split on `\n`. Empty lines are kept.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Flatten segments into one ordered list of lines.
pub fn flatten_lines(segments: &[LyricSegment]) -> Vec<String> {
    segments
        .iter()
        .flat_map(LyricSegment::lines)
        .map(str::to_string)
        .collect()
}
