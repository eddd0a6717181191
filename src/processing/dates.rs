//! Date-range detection for experience entries
//!
//! Each matcher recognises one date-range shape and reports the matched span
//! plus the covered months. [`DateRangeParser`] tries its matchers in order and
//! the first hit wins, so more precise shapes must come before looser ones.

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";
const SEPARATOR: &str = r"\s*(?:-|–|—|to|until|till|through)\s*";
const PRESENT: &str = r"(present|current|now|today|ongoing|date)";
const YEAR: &str = r"((?:19|20)\d{2})";

/// Calendar month used for duration arithmetic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// A date range found in a line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateSpan {
    /// The matched text, e.g. `Jan 2019 – Present`
    pub text: String,
    /// Byte offsets of the match within the line
    pub start: usize,
    pub end: usize,
    /// Covered months, `None` when the range could not be resolved
    pub months: Option<u32>,
}

/// One recognisable date-range shape
pub trait DateRangeMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Find the first range of this shape in `line`. `today` resolves
    /// open-ended ranges such as "Present".
    fn find(&self, line: &str, today: YearMonth) -> Option<DateSpan>;
}

/// Inclusive month count between two months
pub fn months_between(start: YearMonth, end: YearMonth) -> Option<u32> {
    let diff = end.index() - start.index();
    (diff >= 0).then(|| (diff + 1) as u32)
}

/// Month count for a year-only range
pub fn months_between_years(start_year: i32, end_year: i32) -> Option<u32> {
    (end_year >= start_year).then(|| ((end_year - start_year) * 12) as u32)
}

/// Month number from an English month name or abbreviation
pub fn parse_month(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Small counts written as digits or English words ("3", "three")
pub fn parse_count(word: &str) -> Option<u32> {
    if let Ok(value) = word.trim().parse() {
        return Some(value);
    }
    let value = match word.trim().to_lowercase().as_str() {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        _ => return None,
    };
    Some(value)
}

/// Regex alternation matching what [`parse_count`] accepts
pub const COUNT_PATTERN: &str =
    r"(\d{1,2}|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen)";

fn span_from(caps: &Captures<'_>, months: Option<u32>) -> Option<DateSpan> {
    let whole = caps.get(0)?;
    Some(DateSpan {
        text: whole.as_str().trim().to_string(),
        start: whole.start(),
        end: whole.end(),
        months,
    })
}

fn capture_number<T: std::str::FromStr>(caps: &Captures<'_>, index: usize) -> Option<T> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

/// `Jan 2019 – Mar 2021`, `September 2020 to Present`
pub struct MonthYearRange {
    regex: Regex,
}

impl MonthYearRange {
    pub fn new() -> Self {
        let pattern = format!(
            r"(?i)\b{MONTH}\s+(\d{{4}}){SEPARATOR}(?:{MONTH}\s+(\d{{4}})|{PRESENT})\b"
        );
        Self {
            regex: Regex::new(&pattern).expect("Invalid month-year range regex"),
        }
    }
}

impl DateRangeMatcher for MonthYearRange {
    fn name(&self) -> &'static str {
        "month-year"
    }

    fn find(&self, line: &str, today: YearMonth) -> Option<DateSpan> {
        let caps = self.regex.captures(line)?;

        let start = caps
            .get(1)
            .and_then(|m| parse_month(m.as_str()))
            .and_then(|month| YearMonth::new(capture_number(&caps, 2)?, month));

        let end = if caps.get(5).is_some() {
            Some(today)
        } else {
            caps.get(3)
                .and_then(|m| parse_month(m.as_str()))
                .and_then(|month| YearMonth::new(capture_number(&caps, 4)?, month))
        };

        let months = match (start, end) {
            (Some(start), Some(end)) => months_between(start, end),
            _ => None,
        };
        span_from(&caps, months)
    }
}

/// `03/2018 - 11/2020`, `6/2021 – present`
pub struct NumericMonthRange {
    regex: Regex,
}

impl NumericMonthRange {
    pub fn new() -> Self {
        let pattern = format!(
            r"(?i)\b(\d{{1,2}})/(\d{{4}}){SEPARATOR}(?:(\d{{1,2}})/(\d{{4}})|{PRESENT})\b"
        );
        Self {
            regex: Regex::new(&pattern).expect("Invalid numeric month range regex"),
        }
    }
}

impl DateRangeMatcher for NumericMonthRange {
    fn name(&self) -> &'static str {
        "numeric-month"
    }

    fn find(&self, line: &str, today: YearMonth) -> Option<DateSpan> {
        let caps = self.regex.captures(line)?;

        let start = YearMonth::new(capture_number(&caps, 2)?, capture_number(&caps, 1)?);
        let end = if caps.get(5).is_some() {
            Some(today)
        } else {
            capture_number(&caps, 4).and_then(|year| YearMonth::new(year, capture_number(&caps, 3)?))
        };

        let months = match (start, end) {
            (Some(start), Some(end)) => months_between(start, end),
            _ => None,
        };
        span_from(&caps, months)
    }
}

/// `2016 – 2019`, `2020-Present`
pub struct YearRange {
    regex: Regex,
}

impl YearRange {
    pub fn new() -> Self {
        let pattern = format!(r"(?i)\b{YEAR}{SEPARATOR}(?:{YEAR}|{PRESENT})\b");
        Self {
            regex: Regex::new(&pattern).expect("Invalid year range regex"),
        }
    }
}

impl DateRangeMatcher for YearRange {
    fn name(&self) -> &'static str {
        "year"
    }

    fn find(&self, line: &str, today: YearMonth) -> Option<DateSpan> {
        let caps = self.regex.captures(line)?;

        let start_year: i32 = capture_number(&caps, 1)?;
        let end_year = if caps.get(3).is_some() {
            Some(today.year)
        } else {
            capture_number(&caps, 2)
        };

        let months = end_year.and_then(|end| months_between_years(start_year, end));
        span_from(&caps, months)
    }
}

/// `Since 2018`, `from March 2020`
pub struct OpenEndedRange {
    regex: Regex,
}

impl OpenEndedRange {
    pub fn new() -> Self {
        let pattern = format!(r"(?i)\b(?:since|from)\s+(?:{MONTH}\s+)?{YEAR}\b");
        Self {
            regex: Regex::new(&pattern).expect("Invalid open-ended range regex"),
        }
    }
}

impl DateRangeMatcher for OpenEndedRange {
    fn name(&self) -> &'static str {
        "open-ended"
    }

    fn find(&self, line: &str, today: YearMonth) -> Option<DateSpan> {
        let caps = self.regex.captures(line)?;
        let year: i32 = capture_number(&caps, 2)?;

        let months = match caps.get(1).and_then(|m| parse_month(m.as_str())) {
            Some(month) => YearMonth::new(year, month).and_then(|start| months_between(start, today)),
            None => months_between_years(year, today.year),
        };
        span_from(&caps, months)
    }
}

/// `2019 – TBD`: still delimits an entry, duration unknown
pub struct UnresolvedRange {
    regex: Regex,
}

impl UnresolvedRange {
    pub fn new() -> Self {
        let pattern = format!(r"(?i)\b{YEAR}\s*(?:-|–|—|to)\s*[a-z?]+");
        Self {
            regex: Regex::new(&pattern).expect("Invalid unresolved range regex"),
        }
    }
}

impl DateRangeMatcher for UnresolvedRange {
    fn name(&self) -> &'static str {
        "unresolved"
    }

    fn find(&self, line: &str, _today: YearMonth) -> Option<DateSpan> {
        let caps = self.regex.captures(line)?;
        span_from(&caps, None)
    }
}

/// Ordered list of date-range matchers, first match wins
pub struct DateRangeParser {
    matchers: Vec<Box<dyn DateRangeMatcher>>,
}

impl Default for DateRangeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRangeParser {
    pub fn new() -> Self {
        Self::with_matchers(vec![
            Box::new(MonthYearRange::new()),
            Box::new(NumericMonthRange::new()),
            Box::new(YearRange::new()),
            Box::new(OpenEndedRange::new()),
            Box::new(UnresolvedRange::new()),
        ])
    }

    pub fn with_matchers(matchers: Vec<Box<dyn DateRangeMatcher>>) -> Self {
        Self { matchers }
    }

    pub fn parse(&self, line: &str, today: YearMonth) -> Option<DateSpan> {
        self.matchers.iter().find_map(|matcher| {
            let span = matcher.find(line, today)?;
            log::trace!("Date range '{}' matched by {}", span.text, matcher.name());
            Some(span)
        })
    }

    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> YearMonth {
        YearMonth::new(2024, 6).unwrap()
    }

    #[test]
    fn test_month_year_range() {
        let span = MonthYearRange::new()
            .find("Data Analyst, Acme  Jan 2019 – Dec 2020", today())
            .unwrap();

        assert_eq!(span.text, "Jan 2019 – Dec 2020");
        assert_eq!(span.months, Some(24));
    }

    #[test]
    fn test_month_year_to_present() {
        let span = MonthYearRange::new()
            .find("Sept. 2023 to Present", today())
            .unwrap();

        assert_eq!(span.months, Some(10));
    }

    #[test]
    fn test_numeric_month_range() {
        let matcher = NumericMonthRange::new();

        assert_eq!(matcher.find("03/2018 - 02/2019", today()).unwrap().months, Some(12));
        // Month 13 still delimits an entry but the duration is unknown
        assert_eq!(matcher.find("13/2018 - 02/2019", today()).unwrap().months, None);
    }

    #[test]
    fn test_year_range() {
        let matcher = YearRange::new();

        assert_eq!(matcher.find("Engineer 2016-2019", today()).unwrap().months, Some(36));
        assert_eq!(matcher.find("2020 – current", today()).unwrap().months, Some(48));
        assert_eq!(matcher.find("2021 - 2019", today()).unwrap().months, None);
        assert!(matcher.find("Call 555-1234", today()).is_none());
    }

    #[test]
    fn test_open_ended_range() {
        let matcher = OpenEndedRange::new();

        assert_eq!(matcher.find("Consultant since 2020", today()).unwrap().months, Some(48));
        assert_eq!(matcher.find("from March 2024", today()).unwrap().months, Some(4));
    }

    #[test]
    fn test_first_match_wins() {
        let parser = DateRangeParser::new();

        // The month-year shape takes priority over the year-only shape
        let span = parser.parse("Jun 2020 - Jun 2021", today()).unwrap();
        assert_eq!(span.months, Some(13));

        let span = parser.parse("2019 – TBD", today()).unwrap();
        assert_eq!(span.months, None);

        assert!(parser.parse("Led a team of five engineers", today()).is_none());
        assert_eq!(parser.matcher_names().first(), Some(&"month-year"));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("7"), Some(7));
        assert_eq!(parse_count("Three"), Some(3));
        assert_eq!(parse_count("several"), None);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("September"), Some(9));
        assert_eq!(parse_month("dec"), Some(12));
        assert_eq!(parse_month("Smarch"), None);
    }
}
