//! Source format detection

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format of an uploaded resume or job description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Pdf,
    Docx,
    Txt,
    Markdown,
    Unknown,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => SourceFormat::Pdf,
            "docx" => SourceFormat::Docx,
            "txt" | "text" => SourceFormat::Txt,
            "md" | "markdown" => SourceFormat::Markdown,
            _ => SourceFormat::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(SourceFormat::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_formats() {
        assert_eq!(SourceFormat::from_extension("PDF"), SourceFormat::Pdf);
        assert_eq!(SourceFormat::from_extension("docx"), SourceFormat::Docx);
        assert_eq!(SourceFormat::from_path(Path::new("cv/resume.md")), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_path(Path::new("job.txt")), SourceFormat::Txt);
        assert_eq!(SourceFormat::from_path(Path::new("README")), SourceFormat::Unknown);
    }
}
