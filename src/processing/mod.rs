//! Text processing and match scoring

pub mod text_processor;
pub mod taxonomy;
pub mod skill_extractor;
pub mod dates;
pub mod degrees;
pub mod sections;
pub mod stemmer;
pub mod keywords;
pub mod requirements;
pub mod matcher;
pub mod analyzer;
