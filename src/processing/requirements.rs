//! Minimum experience and degree requirements stated in a job description

use crate::processing::dates::{parse_count, COUNT_PATTERN};
use crate::processing::degrees::{DegreeDetector, DegreeLevel};
use crate::processing::text_processor::TextProcessor;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Stated minimums above this are treated as noise
const MAX_REQUIRED_YEARS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRequirement {
    pub months: u32,
    /// The sentence that stated the requirement
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeRequirement {
    pub level: DegreeLevel,
    pub statement: String,
}

/// Explicit requirements that replace whatever the job description states
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_experience_years: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_degree: Option<DegreeLevel>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRequirements {
    pub experience: Option<ExperienceRequirement>,
    pub degree: Option<DegreeRequirement>,
}

pub struct RequirementParser {
    /// Ordered years patterns; capture 1 is the minimum
    years_patterns: Vec<Regex>,
    preferred_regex: Regex,
    degrees: DegreeDetector,
}

impl Default for RequirementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementParser {
    pub fn new() -> Self {
        let unit = r"(?:years?|yrs?)";
        let years_patterns = [
            // "2-4 years", "three to five years"
            format!(r"(?i)\b{COUNT_PATTERN}\s*(?:-|–|to)\s*{COUNT_PATTERN}\s*\+?\s*{unit}"),
            // "minimum of 5 years", "at least three years"
            format!(r"(?i)\b(?:minimum|min\.?|at\s+least)\s+(?:of\s+)?{COUNT_PATTERN}\s*\+?\s*{unit}"),
            // "3+ years"
            format!(r"(?i)\b{COUNT_PATTERN}\s*\+\s*{unit}"),
            // "5 years of professional experience"
            format!(r"(?i)\b{COUNT_PATTERN}\s*{unit}\s+(?:of\s+)?(?:[a-z-]+\s+){{0,3}}?(?:experience|exp)\b"),
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("Invalid experience requirement regex"))
        .collect();

        let preferred_regex = Regex::new(
            r"(?i)\b(?:preferred|prefer|bonus|nice[\s-]to[\s-]have|a\s+plus|desired|desirable|advantage|advantageous)\b",
        )
        .expect("Invalid preference regex");

        Self {
            years_patterns,
            preferred_regex,
            degrees: DegreeDetector::new(),
        }
    }

    /// Parse both requirements, then apply the overrides
    pub fn parse(
        &self,
        text: &str,
        processor: &TextProcessor,
        overrides: &RequirementOverrides,
    ) -> ParsedRequirements {
        let sentences = clauses(processor, text);

        let experience = match overrides.min_experience_years {
            Some(years) => Some(ExperienceRequirement {
                months: (years.max(0.0) * 12.0).round() as u32,
                statement: format!("{} years (configured)", years),
            }),
            None => self.parse_experience(&sentences),
        };

        let degree = match overrides.required_degree {
            Some(level) => Some(DegreeRequirement {
                level,
                statement: format!("{} (configured)", level),
            }),
            None => self.parse_degree(&sentences),
        };

        ParsedRequirements { experience, degree }
    }

    /// Largest minimum-years figure across all sentences
    pub fn parse_experience(&self, sentences: &[String]) -> Option<ExperienceRequirement> {
        let mut best: Option<(u32, &String)> = None;

        for sentence in sentences {
            for years in self.years_in(sentence) {
                if best.map_or(true, |(current, _)| years > current) {
                    best = Some((years, sentence));
                }
            }
        }

        best.map(|(years, sentence)| {
            log::debug!("Experience requirement: {} years from '{}'", years, sentence);
            ExperienceRequirement {
                months: years.min(MAX_REQUIRED_YEARS) * 12,
                statement: sentence.clone(),
            }
        })
    }

    /// Year figures in one sentence. A span claimed by an earlier pattern is
    /// not re-read by a later one, so "2-4 years" yields 2 and not 4.
    fn years_in(&self, sentence: &str) -> Vec<u32> {
        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut years = Vec::new();

        for pattern in &self.years_patterns {
            for caps in pattern.captures_iter(sentence) {
                let Some(whole) = caps.get(0) else { continue };
                if claimed.iter().any(|&(s, e)| whole.start() < e && s < whole.end()) {
                    continue;
                }
                claimed.push((whole.start(), whole.end()));
                if let Some(value) = caps.get(1).and_then(|m| parse_count(m.as_str())) {
                    years.push(value);
                }
            }
        }
        years
    }

    /// Lowest recognised degree mentioned in a non-preferred sentence
    pub fn parse_degree(&self, sentences: &[String]) -> Option<DegreeRequirement> {
        sentences
            .iter()
            .filter(|sentence| !self.preferred_regex.is_match(sentence))
            .filter_map(|sentence| {
                self.degrees
                    .find_all(sentence)
                    .into_iter()
                    .map(|mention| mention.level)
                    .filter(|level| level.is_recognized_degree())
                    .min()
                    .map(|level| (level, sentence))
            })
            .min_by_key(|(level, _)| *level)
            .map(|(level, sentence)| DegreeRequirement {
                level,
                statement: sentence.clone(),
            })
    }
}

/// Sentences further split at semicolons, so a preferred clause does not
/// hide a required one
fn clauses(processor: &TextProcessor, text: &str) -> Vec<String> {
    processor
        .split_sentences(text)
        .iter()
        .flat_map(|sentence| sentence.split(';'))
        .map(|clause| clause.trim().to_string())
        .filter(|clause| !clause.is_empty())
        .collect()
}
