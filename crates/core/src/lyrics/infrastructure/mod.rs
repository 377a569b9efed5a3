pub mod yaml_lyric_reader;
