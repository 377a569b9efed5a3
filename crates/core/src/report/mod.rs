pub mod word_reporter;
