use std::fs;
use std::path::Path;

use crate::lyrics::domain::lyric_segment::LyricSegment;
use crate::lyrics::domain::lyric_source::{LyricError, LyricSource};

/// Reads a UTF-16 YAML document holding a sequence of `{ text: ... }` records.
///
/// The byte-order mark selects the endianness; without one the bytes are read
/// as little-endian. Line endings are normalized to `\n` before parsing.
#[derive(Debug, Default)]
pub struct YamlLyricReader;

impl YamlLyricReader {
    pub fn new() -> Self {
        Self
    }
}

impl LyricSource for YamlLyricReader {
    fn load_segments(&self, path: &Path) -> Result<Vec<LyricSegment>, LyricError> {
        let bytes = fs::read(path).map_err(|e| LyricError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let text = decode_utf16(&bytes).map_err(|reason| LyricError::Encoding {
            path: path.to_path_buf(),
            reason,
        })?;
        let text = text.replace("\r\n", "\n");

        let segments: Vec<LyricSegment> =
            serde_yaml::from_str(&text).map_err(|e| LyricError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        log::debug!("Read {} lyric segments from {}", segments.len(), path.display());
        Ok(segments)
    }
}

fn decode_utf16(bytes: &[u8]) -> Result<String, String> {
    let (body, big_endian) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        _ => (bytes, false),
    };
    if body.len() % 2 != 0 {
        return Err(format!("odd byte length {}", body.len()));
    }

    let units = body.chunks_exact(2).map(|pair| {
        let pair = [pair[0], pair[1]];
        if big_endian {
            u16::from_be_bytes(pair)
        } else {
            u16::from_le_bytes(pair)
        }
    });
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| format!("unpaired surrogate 0x{:04X}", e.unpaired_surrogate()))
}
