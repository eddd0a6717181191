//! Salient-term extraction from job descriptions

use crate::error::{Result, ResumeMatcherError};
use crate::processing::stemmer::stem;
use crate::processing::text_processor::{NormalizedText, TextProcessor};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Words that appear in nearly every job posting and say nothing about the role
const JD_FILLER_WORDS: &[&str] = &[
    "ability", "able", "apply", "bonus", "candidate", "company", "environment",
    "excellent", "experience", "familiarity", "ideal", "including", "job", "join",
    "knowledge", "least", "looking", "minimum", "new", "nice", "opportunity", "plus",
    "position", "preferred", "proficiency", "proven", "qualification", "related",
    "required", "requirement", "responsibility", "role", "seeking", "skill", "strong",
    "team", "well", "work", "year",
];

/// A JD term with its salience weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// First surface form seen in the text
    pub term: String,
    pub stem: String,
    pub weight: f64,
}

/// Keywords sorted by descending weight, one entry per stem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<Keyword>);

impl KeywordSet {
    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.0.iter().map(|k| k.weight).sum()
    }

    pub fn terms(&self) -> Vec<&str> {
        self.0.iter().map(|k| k.term.as_str()).collect()
    }
}

/// Document frequencies from a set of reference documents, used to discount
/// terms that every posting shares
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceCorpus {
    documents: usize,
    document_frequency: HashMap<String, usize>,
}

impl ReferenceCorpus {
    pub fn from_texts<I, S>(texts: I, processor: &TextProcessor) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Self::default();
        for text in texts {
            corpus.documents += 1;
            for term in stem_set(&processor.normalize(text.as_ref())) {
                *corpus.document_frequency.entry(term).or_insert(0) += 1;
            }
        }
        corpus
    }

    pub fn document_count(&self) -> usize {
        self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.documents == 0
    }

    /// Smoothed inverse document frequency, `ln((N + 1) / (df + 1)) + 1`
    pub fn idf(&self, stem: &str) -> f64 {
        let df = self.document_frequency.get(stem).copied().unwrap_or(0);
        ((self.documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0
    }
}

/// Stems of every token in a normalized text
pub fn stem_set(text: &NormalizedText) -> HashSet<String> {
    text.tokens().iter().map(|token| stem(token)).collect()
}

#[derive(Debug)]
pub struct KeywordExtractor {
    top_n: usize,
    filler_stems: HashSet<String>,
}

struct Candidate {
    term: String,
    first_seen: usize,
    count: usize,
}

impl KeywordExtractor {
    pub fn new(top_n: usize) -> Result<Self> {
        if top_n == 0 {
            return Err(ResumeMatcherError::Configuration(
                "keyword_top_n must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            top_n,
            filler_stems: JD_FILLER_WORDS.iter().map(|w| stem(w)).collect(),
        })
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Rank the terms of a job description.
    ///
    /// Weight is the term frequency of the stem, scaled by the corpus IDF
    /// when a reference corpus is given.
    pub fn extract(&self, text: &NormalizedText, corpus: Option<&ReferenceCorpus>) -> KeywordSet {
        let mut candidates: HashMap<String, Candidate> = HashMap::new();

        for (position, token) in text.tokens().iter().enumerate() {
            if token.chars().count() < 2 || !token.chars().any(char::is_alphabetic) {
                continue;
            }
            let token_stem = stem(token);
            if self.filler_stems.contains(&token_stem) {
                continue;
            }

            candidates
                .entry(token_stem)
                .or_insert_with(|| Candidate {
                    term: token.clone(),
                    first_seen: position,
                    count: 0,
                })
                .count += 1;
        }

        let mut ranked: Vec<(Keyword, usize)> = candidates
            .into_iter()
            .map(|(stem, candidate)| {
                let idf = corpus.map_or(1.0, |c| c.idf(&stem));
                let keyword = Keyword {
                    term: candidate.term,
                    weight: candidate.count as f64 * idf,
                    stem,
                };
                (keyword, candidate.first_seen)
            })
            .collect();

        ranked.sort_by(|(a, a_first), (b, b_first)| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a_first.cmp(b_first))
        });
        ranked.truncate(self.top_n);

        log::debug!(
            "Extracted {} keywords (top {}, idf: {})",
            ranked.len(),
            self.top_n,
            corpus.is_some()
        );

        KeywordSet(ranked.into_iter().map(|(keyword, _)| keyword).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> NormalizedText {
        TextProcessor::new().normalize(text)
    }

    #[test]
    fn test_frequency_ranking() {
        let extractor = KeywordExtractor::new(30).unwrap();
        let keywords = extractor.extract(&normalize("Kafka pipelines. Kafka streams. Kafka ops. Python."), None);

        let first = keywords.iter().next().unwrap();
        assert_eq!(first.term, "kafka");
        assert_eq!(first.weight, 3.0);
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let extractor = KeywordExtractor::new(30).unwrap();
        let keywords = extractor.extract(&normalize("tableau dashboards forecasting"), None);

        assert_eq!(keywords.terms(), vec!["tableau", "dashboards", "forecasting"]);
    }

    #[test]
    fn test_stems_grouped_under_first_surface_form() {
        let extractor = KeywordExtractor::new(30).unwrap();
        let keywords = extractor.extract(&normalize("Managing vendors; managed budgets; manage risk"), None);

        let manage = keywords.iter().find(|k| k.stem == "manag").unwrap();
        assert_eq!(manage.term, "managing");
        assert_eq!(manage.weight, 3.0);
    }

    #[test]
    fn test_filler_and_short_tokens_excluded() {
        let extractor = KeywordExtractor::new(30).unwrap();
        let keywords = extractor.extract(
            &normalize("Required: 5+ years experience. Strong SQL skills preferred. R"),
            None,
        );

        assert_eq!(keywords.terms(), vec!["sql"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let extractor = KeywordExtractor::new(2).unwrap();
        let keywords = extractor.extract(&normalize("alpha beta gamma delta beta"), None);

        assert_eq!(keywords.terms(), vec!["beta", "alpha"]);
    }

    #[test]
    fn test_zero_top_n_rejected() {
        assert!(KeywordExtractor::new(0).unwrap_err().is_configuration());
    }

    #[test]
    fn test_idf_discounts_common_terms() {
        let processor = TextProcessor::new();
        let corpus = ReferenceCorpus::from_texts(
            ["communication python", "communication java", "communication golang"],
            &processor,
        );
        assert_eq!(corpus.document_count(), 3);
        assert!(corpus.idf("communication") < corpus.idf("terraform"));

        let extractor = KeywordExtractor::new(30).unwrap();
        let keywords = extractor.extract(&processor.normalize("communication terraform"), Some(&corpus));

        assert_eq!(keywords.terms(), vec!["terraform", "communication"]);
        assert!((keywords.total_weight() - (1.0 + (4.0f64).ln() + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text() {
        let extractor = KeywordExtractor::new(30).unwrap();

        assert!(extractor.extract(&normalize(""), None).is_empty());
    }
}
