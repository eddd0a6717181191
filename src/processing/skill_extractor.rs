//! Skill detection against a taxonomy

use crate::error::{Result, ResumeMatcherError};
use crate::processing::taxonomy::SkillTaxonomy;
use crate::processing::text_processor::{NormalizedText, TextProcessor};
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of canonical skill identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn intersection(&self, other: &SkillSet) -> BTreeSet<String> {
        self.0.intersection(&other.0).cloned().collect()
    }

    pub fn difference(&self, other: &SkillSet) -> BTreeSet<String> {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl FromIterator<String> for SkillSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Finds taxonomy synonyms as whole-token phrases in a normalized token stream.
///
/// Synonyms are normalized with the same processor as the text and matched
/// against the space-joined token stream with a single space of padding on
/// each side, so a pattern can only start and end on token boundaries.
pub struct SkillExtractor {
    matcher: Option<AhoCorasick>,
    /// Canonical skill for each pattern id
    pattern_skills: Vec<String>,
}

impl SkillExtractor {
    pub fn new(taxonomy: &SkillTaxonomy, processor: &TextProcessor) -> Result<Self> {
        taxonomy.validate(processor)?;

        let mut patterns = Vec::new();
        let mut pattern_skills = Vec::new();

        for (canonical, forms) in taxonomy.iter() {
            for form in forms {
                let tokens = processor.tokenize(form);
                patterns.push(format!(" {} ", tokens.join(" ")));
                pattern_skills.push(canonical.to_string());
            }
        }

        let matcher = if patterns.is_empty() {
            None
        } else {
            let matcher = AhoCorasick::builder()
                .build(&patterns)
                .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to build skill matcher: {}", e)))?;
            Some(matcher)
        };

        log::debug!(
            "Compiled skill matcher: {} skills, {} surface forms",
            taxonomy.len(),
            patterns.len()
        );

        Ok(Self {
            matcher,
            pattern_skills,
        })
    }

    /// Canonical skills whose synonyms occur in the text
    pub fn extract(&self, text: &NormalizedText) -> SkillSet {
        let Some(matcher) = &self.matcher else {
            return SkillSet::default();
        };
        if text.is_empty() {
            return SkillSet::default();
        }

        let haystack = format!(" {} ", text.tokens().join(" "));

        matcher
            .find_overlapping_iter(&haystack)
            .map(|mat| self.pattern_skills[mat.pattern().as_usize()].clone())
            .collect()
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_skills.len()
    }
}
