pub mod chart;
pub mod error;
pub mod extractor;
pub mod sink;
