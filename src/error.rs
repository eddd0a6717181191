//! Error handling for the resume matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Empty input: both the resume and the job description are blank")]
    EmptyInput,

    #[error("Text extraction error: {0}")]
    TextExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeMatcherError>;

impl ResumeMatcherError {
    /// Whether the error comes from a contract violation in the analysis
    /// configuration rather than from I/O or the caller layer
    pub fn is_configuration(&self) -> bool {
        matches!(self, ResumeMatcherError::Configuration(_))
    }
}

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeMatcherError {
    fn from(err: anyhow::Error) -> Self {
        ResumeMatcherError::AnalysisFailed(err.to_string())
    }
}
