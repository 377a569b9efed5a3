pub mod error;
pub mod lyrics;
pub mod pipeline;
pub mod recognition;
pub mod report;
pub mod shared;
pub mod storage;
