//! Resume matcher library: explainable scoring of a resume against a job description

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::{AnalysisConfig, Config};
pub use error::{Result, ResumeMatcherError};
pub use processing::analyzer::{analyze, AnalysisEngine, MatchReport};
