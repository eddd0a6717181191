//! Input processing module
//! Handles format detection, text extraction, and input management

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::SourceFormat;
pub use manager::{InputManager, SourceDocument};
