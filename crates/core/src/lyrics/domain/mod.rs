pub mod lyric_segment;
pub mod lyric_source;
