//! Degree levels and degree-mention detection

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic degree level with a total order.
///
/// `Unknown` marks a credential whose level could not be identified
/// (a bare "degree", "diploma" or "certificate"). It orders above `None`
/// but shares its rung on the degree ladder used for distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DegreeLevel {
    None,
    Unknown,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl DegreeLevel {
    /// Position on the degree ladder, `None` and `Unknown` share rung 0
    pub fn rung(self) -> u8 {
        match self {
            DegreeLevel::None | DegreeLevel::Unknown => 0,
            DegreeLevel::Associate => 1,
            DegreeLevel::Bachelor => 2,
            DegreeLevel::Master => 3,
            DegreeLevel::Doctorate => 4,
        }
    }

    /// Ladder rungs separating `self` from a higher `required` level, 0 when
    /// `self` already meets it
    pub fn steps_below(self, required: DegreeLevel) -> u8 {
        required.rung().saturating_sub(self.rung())
    }

    /// Whether this level names an actual academic degree
    pub fn is_recognized_degree(self) -> bool {
        self.rung() > 0
    }
}

impl fmt::Display for DegreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegreeLevel::None => write!(f, "No degree"),
            DegreeLevel::Unknown => write!(f, "Unspecified credential"),
            DegreeLevel::Associate => write!(f, "Associate"),
            DegreeLevel::Bachelor => write!(f, "Bachelor"),
            DegreeLevel::Master => write!(f, "Master"),
            DegreeLevel::Doctorate => write!(f, "Doctorate"),
        }
    }
}

/// A degree mention inside a line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeMention {
    pub level: DegreeLevel,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Recognises the mentions of one degree level
struct DegreeMatcher {
    level: DegreeLevel,
    regex: Regex,
    /// Words that, right before a match, turn it into something other than a
    /// degree ("Scrum Master")
    excluded_prefixes: &'static [&'static str],
}

impl DegreeMatcher {
    fn new(level: DegreeLevel, pattern: &str, excluded_prefixes: &'static [&'static str]) -> Self {
        Self {
            level,
            regex: Regex::new(pattern).expect("Invalid degree regex"),
            excluded_prefixes,
        }
    }

    /// A `degree` capture group, when it participates, bounds the mention
    /// and the rest of the match is context only
    fn mentions<'a>(&'a self, line: &'a str) -> impl Iterator<Item = DegreeMention> + 'a {
        self.regex
            .captures_iter(line)
            .filter_map(|caps| caps.name("degree").or_else(|| caps.get(0)))
            .filter(move |m| !self.is_excluded(&line[..m.start()]))
            .map(move |m| DegreeMention {
                level: self.level,
                text: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            })
    }

    fn is_excluded(&self, before: &str) -> bool {
        let previous = before
            .split_whitespace()
            .last()
            .map(|w| w.to_lowercase())
            .unwrap_or_default();
        self.excluded_prefixes.contains(&previous.as_str())
    }
}

/// Ordered degree matchers, highest level first
pub struct DegreeDetector {
    matchers: Vec<DegreeMatcher>,
}

impl Default for DegreeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl DegreeDetector {
    pub fn new() -> Self {
        let matchers = vec![
            DegreeMatcher::new(
                DegreeLevel::Doctorate,
                r"(?i)\b(?:ph\.?\s?d\b\.?|doctorate|doctoral|doctor\s+of\s+\w+|d\.phil\b)",
                &[],
            ),
            DegreeMatcher::new(
                DegreeLevel::Master,
                concat!(
                    r"(?i)\b(?:master['’]s|masters\b|master\s+(?:of|in|degree)\b",
                    r"|m\.s(?:c|\.|\b)|msc\b|m\.a\.|mba\b|m\.eng\b|meng\b)",
                    r"|(?P<degree>\b(?-i:MS|MA)\s+(?:in|of))\s+[a-z]",
                ),
                &["scrum", "web", "quiz", "post", "ring"],
            ),
            DegreeMatcher::new(
                DegreeLevel::Bachelor,
                concat!(
                    r"(?i)\b(?:bachelor['’]s|bachelors\b|bachelor\s+(?:of|in|degree)\b",
                    r"|b\.s(?:c|\.|\b)|bsc\b|b\.a\.|b\.eng\b|beng\b|b\.tech\b|btech\b|b\.e\.)",
                    r"|(?P<degree>\b(?-i:BS|BA)\s+(?:in|of))\s+[a-z]",
                ),
                &[],
            ),
            DegreeMatcher::new(
                DegreeLevel::Associate,
                r"(?i)\bassociate['’]?s?\s+(?:degree|of\s+(?:arts|science|applied))\b",
                &[],
            ),
            DegreeMatcher::new(
                DegreeLevel::None,
                r"(?i)\b(?:high\s+school|secondary\s+school|ged)\b",
                &[],
            ),
            DegreeMatcher::new(
                DegreeLevel::Unknown,
                r"(?i)\b(?:degree|diploma|certificate)\b",
                &[],
            ),
        ];
        Self { matchers }
    }

    /// The highest-priority mention in a line
    pub fn find(&self, line: &str) -> Option<DegreeMention> {
        self.matchers
            .iter()
            .find_map(|matcher| matcher.mentions(line).next())
    }

    /// Every recognised mention in a text, in matcher order
    pub fn find_all(&self, text: &str) -> Vec<DegreeMention> {
        self.matchers
            .iter()
            .flat_map(|matcher| matcher.mentions(text))
            .collect()
    }
}
