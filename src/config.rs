//! Configuration management for the resume matcher

use crate::error::{Result, ResumeMatcherError};
use crate::processing::dates::YearMonth;
use crate::processing::keywords::ReferenceCorpus;
use crate::processing::matcher::Category;
use crate::processing::requirements::RequirementOverrides;
use crate::processing::taxonomy::SkillTaxonomy;
use crate::processing::text_processor::{StopwordList, TextProcessor};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tolerance on the sum of the category weights
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

const DEFAULT_KEYWORD_TOP_N: usize = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Everything that shapes one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_keyword_top_n")]
    pub keyword_top_n: usize,
    /// Resolves "Present" in date ranges; today when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<NaiveDate>,
    #[serde(default)]
    pub stopword_list: StopwordList,
    #[serde(default)]
    pub category_weights: CategoryWeights,
    #[serde(default)]
    pub requirement_overrides: RequirementOverrides,
    #[serde(default)]
    pub skill_taxonomy: SkillTaxonomy,
    /// Document frequencies for IDF keyword weighting, built at runtime
    #[serde(skip)]
    pub reference_corpus: Option<ReferenceCorpus>,
}

/// Weight of each category in the overall score; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub keywords: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub include_recommendations: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
}

fn default_keyword_top_n() -> usize {
    DEFAULT_KEYWORD_TOP_N
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keyword_top_n: DEFAULT_KEYWORD_TOP_N,
            reference_date: None,
            stopword_list: StopwordList::default(),
            category_weights: CategoryWeights::default(),
            requirement_overrides: RequirementOverrides::default(),
            skill_taxonomy: SkillTaxonomy::default(),
            reference_corpus: None,
        }
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.3,
            education: 0.15,
            keywords: 0.15,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            include_recommendations: true,
            color_output: true,
        }
    }
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Skills => self.skills,
            Category::Experience => self.experience,
            Category::Education => self.education,
            Category::Keywords => self.keywords,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let weight = self.get(category);
            if !weight.is_finite() {
                return Err(ResumeMatcherError::Configuration(format!(
                    "Weight for {} is not a finite number",
                    category
                )));
            }
            if weight < 0.0 {
                return Err(ResumeMatcherError::Configuration(format!(
                    "Weight for {} is negative ({})",
                    category, weight
                )));
            }
        }

        let sum: f64 = Category::ALL.iter().map(|c| self.get(*c)).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ResumeMatcherError::Configuration(format!(
                "Category weights must sum to 1.0, got {}",
                sum
            )));
        }
        Ok(())
    }
}

impl AnalysisConfig {
    /// Check every contract the analysis relies on
    pub fn validate(&self) -> Result<()> {
        self.category_weights.validate()?;

        if self.keyword_top_n == 0 {
            return Err(ResumeMatcherError::Configuration(
                "keyword_top_n must be at least 1".to_string(),
            ));
        }

        if let Some(years) = self.requirement_overrides.min_experience_years {
            if !years.is_finite() || years < 0.0 {
                return Err(ResumeMatcherError::Configuration(format!(
                    "min_experience_years override must be a non-negative number, got {}",
                    years
                )));
            }
        }

        let processor = TextProcessor::with_stop_words(self.stopword_list.clone());
        self.skill_taxonomy.validate(&processor)
    }

    /// Month that "Present" resolves to
    pub fn today(&self) -> YearMonth {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
            .into()
    }

    pub fn with_reference_corpus(mut self, corpus: ReferenceCorpus) -> Self {
        self.reference_corpus = Some(corpus);
        self
    }
}

impl Config {
    /// Load the user config, writing the defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            log::info!("Created default configuration at {}", config_path.display());
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }
}
