//! Input manager: loads resumes, job descriptions and reference corpora

use crate::error::{Result, ResumeMatcherError};
use crate::input::file_detector::SourceFormat;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extracted text plus the format it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub text: String,
    pub format: SourceFormat,
    pub path: PathBuf,
}

pub struct InputManager {
    cache: HashMap<PathBuf, SourceDocument>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn load(&mut self, path: &Path) -> Result<SourceDocument> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let format = SourceFormat::from_path(path);
        let text = match format {
            SourceFormat::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            SourceFormat::Txt => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            SourceFormat::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            SourceFormat::Docx => {
                return Err(ResumeMatcherError::UnsupportedFormat(format!(
                    "DOCX is not supported, export '{}' to PDF or plain text",
                    path.display()
                )));
            }
            SourceFormat::Unknown => {
                return Err(ResumeMatcherError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            warn!("No text could be extracted from {}", path.display());
        }

        let document = SourceDocument {
            text,
            format,
            path: path.to_path_buf(),
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), document.clone());
        }

        Ok(document)
    }

    /// Load every supported document in a directory, skipping other files.
    /// Used to build the reference corpus for keyword weighting.
    pub async fn load_directory(&mut self, dir: &Path) -> Result<Vec<SourceDocument>> {
        let paths = list_supported_files(dir)
            .await
            .with_context(|| format!("Failed to read corpus directory '{}'", dir.display()))?;

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(self.load(&path).await?);
        }
        info!("Loaded {} corpus documents from {}", documents.len(), dir.display());
        Ok(documents)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

async fn list_supported_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let supported = matches!(
            SourceFormat::from_path(&path),
            SourceFormat::Pdf | SourceFormat::Txt | SourceFormat::Markdown
        );
        if supported && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}
