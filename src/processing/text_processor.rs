//! Text normalization shared by every extractor

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

/// Characters that may join the parts of a technical term (`machine-learning`,
/// `node.js`, `c++`, `c#`)
const TERM_JOINERS: [char; 4] = ['-', '.', '+', '#'];

/// Apostrophes are dropped inside words (`master's` -> `masters`)
const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
    "any", "are", "arent", "as", "at", "be", "because", "been", "before", "being",
    "below", "between", "both", "but", "by", "can", "cant", "could", "couldnt", "d",
    "did", "didnt", "do", "does", "doesnt", "doing", "dont", "down", "during", "each",
    "etc", "few", "for", "from", "further", "had", "hadnt", "has", "hasnt", "have",
    "havent", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
    "how", "i", "if", "im", "in", "into", "is", "isnt", "it", "its", "itself", "ive",
    "just", "ll", "m", "may", "me", "might", "more", "most", "must", "my", "myself",
    "no", "nor", "not", "now", "o", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "re", "s", "same", "shall",
    "she", "should", "shouldnt", "so", "some", "such", "t", "than", "that", "thats",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "us", "ve",
    "very", "was", "wasnt", "we", "were", "werent", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "within", "won", "wont", "would",
    "wouldnt", "y", "you", "youd", "youll", "your", "youre", "yours", "yourself",
    "yourselves", "youve",
];

/// Fixed list of words removed during normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopwordList(BTreeSet<String>);

impl Default for StopwordList {
    fn default() -> Self {
        Self(DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect())
    }
}

impl StopwordList {
    /// Build a list from arbitrary words; entries are lowercased and stripped
    /// of apostrophes so they compare against normalized tokens
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            words
                .into_iter()
                .map(|w| {
                    w.as_ref()
                        .to_lowercase()
                        .chars()
                        .filter(|c| !APOSTROPHES.contains(c))
                        .collect::<String>()
                })
                .filter(|w| !w.trim().is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Token stream produced by [`TextProcessor::normalize`], paired with the raw
/// text it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    original: String,
    tokens: Vec<String>,
}

impl NormalizedText {
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Contact details found in a resume; reported, never scored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
}

pub struct TextProcessor {
    stop_words: StopwordList,
    email_regex: Regex,
    phone_regex: Regex,
    linkedin_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self::with_stop_words(StopwordList::default())
    }

    pub fn with_stop_words(stop_words: StopwordList) -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"(?:\+\d{1,3}[-. ]?)?\(?\b[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}\b")
            .expect("Invalid phone regex");

        let linkedin_regex = Regex::new(r"(?i)linkedin\.com/in/[A-Za-z0-9_-]+")
            .expect("Invalid LinkedIn regex");

        Self {
            stop_words,
            email_regex,
            phone_regex,
            linkedin_regex,
        }
    }

    /// Lowercase, strip punctuation, tokenize and drop stopwords.
    ///
    /// Blank input yields an empty token sequence.
    pub fn normalize(&self, text: &str) -> NormalizedText {
        NormalizedText {
            original: text.to_string(),
            tokens: self.tokenize(text),
        }
    }

    /// Tokenize text on Unicode word boundaries, re-joining the pieces of
    /// technical terms that the segmenter splits apart
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut current = String::new();

        for segment in lowered.split_word_bounds() {
            if !segment.chars().all(is_term_char) {
                self.flush_token(&mut current, &mut tokens);
                continue;
            }

            // "..." or "--" between words separates rather than joins
            let is_separator_joiner = segment == "-" || segment == ".";
            if is_separator_joiner && current.ends_with(['-', '.']) {
                self.flush_token(&mut current, &mut tokens);
                continue;
            }

            current.push_str(segment);
        }
        self.flush_token(&mut current, &mut tokens);

        tokens
    }

    fn flush_token(&self, current: &mut String, tokens: &mut Vec<String>) {
        if current.is_empty() {
            return;
        }

        let word: String = current.chars().filter(|c| !APOSTROPHES.contains(c)).collect();
        current.clear();

        let word = word.trim_matches(|c| c == '-' || c == '.');
        if word.chars().any(char::is_alphanumeric) && !self.stop_words.contains(word) {
            tokens.push(word.to_string());
        }
    }

    /// Split raw text into sentences
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Pull the first email, phone number and LinkedIn profile out of raw text
    pub fn extract_contact_info(&self, text: &str) -> ContactInfo {
        ContactInfo {
            email: self.email_regex.find(text).map(|m| m.as_str().to_string()),
            phone: self.phone_regex.find(text).map(|m| m.as_str().trim().to_string()),
            linkedin: self
                .linkedin_regex
                .find(text)
                .map(|m| m.as_str().to_lowercase()),
        }
    }

    pub fn stop_words(&self) -> &StopwordList {
        &self.stop_words
    }
}

fn is_term_char(c: char) -> bool {
    c.is_alphanumeric() || TERM_JOINERS.contains(&c) || APOSTROPHES.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming language is awesome!");

        assert_eq!(tokens, vec!["rust", "programming", "language", "awesome"]);
    }

    #[test]
    fn test_technical_terms_survive() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Built machine-learning APIs in C++, C# and Node.js.");

        assert!(tokens.contains(&"machine-learning".to_string()));
        assert!(tokens.contains(&"c++".to_string()));
        assert!(tokens.contains(&"c#".to_string()));
        assert!(tokens.contains(&"node.js".to_string()));
        assert!(tokens.contains(&"apis".to_string()));
    }

    #[test]
    fn test_punctuation_and_apostrophes() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Master's degree -- Statistics... (CI/CD)");

        assert_eq!(tokens, vec!["masters", "degree", "statistics", "ci", "cd"]);
    }

    #[test]
    fn test_empty_input() {
        let processor = TextProcessor::new();

        assert!(processor.normalize("").is_empty());
        assert!(processor.normalize("   \n\t ").is_empty());
        assert!(processor.normalize(" - • , ").is_empty());
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let processor = TextProcessor::new();
        let text = "Senior ENGINEER — Rust, Go & Kubernetes; 5+ years.";

        assert_eq!(processor.normalize(text), processor.normalize(text));
        assert_eq!(processor.normalize(text).original(), text);
    }

    #[test]
    fn test_custom_stop_words() {
        let processor = TextProcessor::with_stop_words(StopwordList::from_words(["Rust", "it's"]));
        let tokens = processor.tokenize("It's Rust and the rest");

        assert_eq!(tokens, vec!["and", "the", "rest"]);
    }

    #[test]
    fn test_sentence_split() {
        let processor = TextProcessor::new();
        let sentences = processor.split_sentences("Python required. Kafka is a plus.\nSQL");

        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[1], "Kafka is a plus.");
    }

    #[test]
    fn test_contact_info() {
        let processor = TextProcessor::new();
        let text = "Jane Roe | jane.roe@example.com | (555) 123-4567 | linkedin.com/in/jane-roe";

        let contact = processor.extract_contact_info(text);

        assert_eq!(contact.email.as_deref(), Some("jane.roe@example.com"));
        assert!(contact.phone.as_deref().unwrap().contains("123-4567"));
        assert_eq!(contact.linkedin.as_deref(), Some("linkedin.com/in/jane-roe"));
    }
}
