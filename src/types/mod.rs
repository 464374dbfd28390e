pub mod document;
pub mod sample;
