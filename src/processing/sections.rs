//! Resume section detection and experience/education record extraction

use crate::processing::dates::{parse_count, DateRangeParser, DateSpan, YearMonth, COUNT_PATTERN};
use crate::processing::degrees::{DegreeDetector, DegreeLevel};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    Experience,
    Education,
    Skills,
    Summary,
    Projects,
    Certifications,
}

/// Heading phrases per section, checked in this order
const SECTION_HEADINGS: &[(SectionType, &[&str])] = &[
    (
        SectionType::Experience,
        &[
            "experience",
            "work history",
            "employment",
            "employment history",
            "career history",
            "professional background",
        ],
    ),
    (
        SectionType::Education,
        &["education", "academic background", "academic history", "academics"],
    ),
    (
        SectionType::Skills,
        &["skills", "core competencies", "competencies", "expertise", "technologies"],
    ),
    (
        SectionType::Summary,
        &["summary", "profile", "objective", "about", "about me", "overview"],
    ),
    (
        SectionType::Projects,
        &["projects", "portfolio"],
    ),
    (
        SectionType::Certifications,
        &["certifications", "certificates", "licenses"],
    ),
];

/// Separators between a job title and the organization on the same line
const TITLE_SEPARATORS: [&str; 7] = [" at ", " @ ", " | ", ", ", " - ", " – ", " — "];

/// Words that end a role phrase taken from a tenure statement
const ROLE_STOP_WORDS: &[&str] = &[
    "using", "with", "in", "at", "for", "where", "and", "on", "from", "to", "including",
];

const BULLETS: [char; 7] = ['-', '*', '•', '·', '▪', '◦', '–'];

/// One employment entry found in a resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub role: Option<String>,
    pub organization: Option<String>,
    /// Months covered by the entry; `None` when the dates could not be resolved
    pub duration_months: Option<u32>,
    pub date_range: Option<String>,
    pub raw_segment: String,
}

/// One credential found in a resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationRecord {
    pub degree_level: DegreeLevel,
    pub field: Option<String>,
    pub institution: Option<String>,
    pub raw_segment: String,
}

/// Everything the section pass pulls out of a resume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionExtraction {
    pub experience: Vec<ExperienceRecord>,
    pub education: Vec<EducationRecord>,
    pub summary: Option<String>,
    pub detected_sections: Vec<SectionType>,
}

/// Run of lines under one heading; `kind` is `None` before the first heading
struct Zone<'a> {
    kind: Option<SectionType>,
    lines: Vec<&'a str>,
}

/// Entry being assembled while walking experience lines
struct EntryDraft {
    title: Option<String>,
    title_pending: bool,
    span: DateSpan,
    lines: Vec<String>,
}

impl EntryDraft {
    fn into_record(self) -> ExperienceRecord {
        let (role, organization) = match &self.title {
            Some(title) => split_title(title),
            None => (None, None),
        };
        ExperienceRecord {
            role,
            organization,
            duration_months: self.span.months,
            date_range: Some(self.span.text),
            raw_segment: self.lines.join("\n"),
        }
    }
}

pub struct SectionExtractor {
    dates: DateRangeParser,
    degrees: DegreeDetector,
    tenure_regex: Regex,
    institution_regex: Regex,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self::with_parts(DateRangeParser::new(), DegreeDetector::new())
    }

    pub fn with_parts(dates: DateRangeParser, degrees: DegreeDetector) -> Self {
        let tenure_regex = Regex::new(&format!(
            r"(?i)\b{COUNT_PATTERN}\s*\+?\s*(?:years?|yrs?)\.?\s+(?:of\s+)?(?:[a-z]+\s+)?experience\b"
        ))
        .expect("Invalid tenure regex");

        let institution_regex =
            Regex::new(r"(?i)\b(?:university|college|institute|school|academy|polytechnic)\b")
                .expect("Invalid institution regex");

        Self {
            dates,
            degrees,
            tenure_regex,
            institution_regex,
        }
    }

    /// Split a resume into sections and pull out its structured records.
    ///
    /// `today` resolves open-ended ranges ("2019 - Present").
    pub fn extract(&self, text: &str, today: YearMonth) -> SectionExtraction {
        let zones = split_zones(text);

        let mut detected_sections = Vec::new();
        for kind in zones.iter().filter_map(|z| z.kind) {
            if !detected_sections.contains(&kind) {
                detected_sections.push(kind);
            }
        }

        let mut experience_lines = section_lines(&zones, SectionType::Experience, SectionType::Education);
        if !detected_sections.contains(&SectionType::Experience) {
            // Dated degree lines belong to education when nothing says otherwise
            experience_lines.retain(|line| !self.names_degree(line));
        }
        let mut experience = self.extract_experience(&experience_lines, today);
        if experience.is_empty() {
            experience.extend(self.tenure_record(text));
        }

        let education_lines = section_lines(&zones, SectionType::Education, SectionType::Experience);
        let education = self.extract_education(&education_lines);
        let summary = self.extract_summary(&zones, text);

        log::debug!(
            "Sections {:?}: {} experience entries, {} education entries",
            detected_sections,
            experience.len(),
            education.len()
        );

        SectionExtraction {
            experience,
            education,
            summary,
            detected_sections,
        }
    }

    fn extract_experience(&self, lines: &[&str], today: YearMonth) -> Vec<ExperienceRecord> {
        let mut entries: Vec<EntryDraft> = Vec::new();
        let mut pending_title: Option<String> = None;

        for raw in lines {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(span) = self.dates.parse(line, today) {
                let remainder = strip_span(line, span.start, span.end);
                let mut segment = Vec::new();

                let title = if remainder.chars().any(char::is_alphabetic) {
                    Some(remainder)
                } else if let Some(title) = pending_title.take() {
                    // The title line was filed under the previous entry
                    if let Some(previous) = entries.last_mut() {
                        if previous.lines.last() == Some(&title) {
                            previous.lines.pop();
                        }
                    }
                    segment.push(title.clone());
                    Some(title)
                } else {
                    None
                };

                pending_title = None;
                segment.push(line.to_string());
                entries.push(EntryDraft {
                    title_pending: title.is_none(),
                    title,
                    span,
                    lines: segment,
                });
                continue;
            }

            let bullet = line.starts_with(BULLETS);
            match entries.last_mut() {
                Some(current) if current.title_pending && !bullet && current.lines.len() == 1 => {
                    current.title = Some(line.to_string());
                    current.title_pending = false;
                    current.lines.push(line.to_string());
                    pending_title = None;
                    continue;
                }
                Some(current) => current.lines.push(line.to_string()),
                None => {}
            }
            pending_title = (!bullet).then(|| line.to_string());
        }

        entries.into_iter().map(EntryDraft::into_record).collect()
    }

    /// Turn the longest "N years of experience" statement into a single record
    fn tenure_record(&self, text: &str) -> Option<ExperienceRecord> {
        let (years, start, end) = self
            .tenure_regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let years = parse_count(caps.get(1)?.as_str())?;
                Some((years, whole.start(), whole.end()))
            })
            .max_by_key(|(years, ..)| *years)?;

        let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);

        log::debug!("No dated experience entries; using {} year tenure statement", years);

        Some(ExperienceRecord {
            role: role_after_tenure(&text[end..line_end]),
            organization: None,
            duration_months: Some(years * 12),
            date_range: None,
            raw_segment: text[line_start..line_end].trim().to_string(),
        })
    }

    fn extract_education(&self, lines: &[&str]) -> Vec<EducationRecord> {
        let lines: Vec<&str> = lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect();

        lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let mention = self.degrees.find(line)?;
                let field = if mention.level == DegreeLevel::None {
                    None
                } else {
                    field_after_degree(&line[mention.end..])
                };

                let neighbours = [idx.checked_sub(1), Some(idx + 1)];
                let institution = self.institution_in(line).or_else(|| {
                    neighbours
                        .into_iter()
                        .flatten()
                        .filter_map(|i| lines.get(i))
                        .filter(|l| self.degrees.find(l).is_none())
                        .find_map(|l| self.institution_in(l))
                });

                Some(EducationRecord {
                    degree_level: mention.level,
                    field,
                    institution,
                    raw_segment: line.to_string(),
                })
            })
            .collect()
    }

    fn institution_in(&self, line: &str) -> Option<String> {
        line.split(|c: char| ",|;()–—".contains(c))
            .find(|part| self.institution_regex.is_match(part))
            .map(|part| {
                let lower = part.to_ascii_lowercase();
                let cut = [" from ", " at "]
                    .iter()
                    .filter_map(|sep| lower.rfind(sep).map(|i| i + sep.len()))
                    .max()
                    .unwrap_or(0);
                part[cut..].trim().to_string()
            })
            .filter(|name| !name.is_empty())
    }

    fn extract_summary(&self, zones: &[Zone<'_>], text: &str) -> Option<String> {
        let from_zone = zone_lines(zones, SectionType::Summary)
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .take(4)
            .collect::<Vec<_>>()
            .join(" ");
        if !from_zone.is_empty() {
            return Some(from_zone);
        }

        text.lines()
            .take(10)
            .map(str::trim)
            .find(|line| {
                line.chars().count() > 50
                    && !line.chars().take(20).any(|c| c.is_ascii_digit())
                    && heading_of(line).is_none()
            })
            .map(str::to_string)
    }

    fn names_degree(&self, line: &str) -> bool {
        self.degrees
            .find(line)
            .map_or(false, |mention| mention.level.is_recognized_degree())
    }
}

fn split_zones(text: &str) -> Vec<Zone<'_>> {
    let mut zones = vec![Zone {
        kind: None,
        lines: Vec::new(),
    }];

    for line in text.lines() {
        match heading_of(line) {
            Some((kind, inline)) => {
                let mut lines = Vec::new();
                if !inline.trim().is_empty() {
                    lines.push(inline);
                }
                zones.push(Zone {
                    kind: Some(kind),
                    lines,
                });
            }
            None => {
                if let Some(zone) = zones.last_mut() {
                    zone.lines.push(line);
                }
            }
        }
    }
    zones
}

/// Lines of every zone of one kind
fn zone_lines<'a>(zones: &[Zone<'a>], kind: SectionType) -> Vec<&'a str> {
    zones
        .iter()
        .filter(|z| z.kind == Some(kind))
        .flat_map(|z| z.lines.iter().copied())
        .collect()
}

/// Lines under the `kind` headings. A resume without such a heading is
/// scanned everywhere except under `other`.
fn section_lines<'a>(zones: &[Zone<'a>], kind: SectionType, other: SectionType) -> Vec<&'a str> {
    if zones.iter().any(|z| z.kind == Some(kind)) {
        zone_lines(zones, kind)
    } else {
        zones
            .iter()
            .filter(|z| z.kind != Some(other))
            .flat_map(|z| z.lines.iter().copied())
            .collect()
    }
}

/// Recognise a section heading, returning any content after a trailing colon
fn heading_of(line: &str) -> Option<(SectionType, &str)> {
    let trimmed = line.trim();
    if trimmed.starts_with(BULLETS) || trimmed.ends_with('.') {
        return None;
    }
    let (head, inline) = match trimmed.split_once(':') {
        Some((head, inline)) => (head, inline),
        None => (trimmed, ""),
    };
    if head.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = head
        .to_lowercase()
        .replace('&', " and ")
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>();
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() || words.len() > 4 {
        return None;
    }
    let normalized = words.join(" ");

    SECTION_HEADINGS.iter().find_map(|(kind, phrases)| {
        phrases
            .iter()
            .any(|phrase| {
                normalized == *phrase
                    || normalized.starts_with(&format!("{phrase} "))
                    || normalized.ends_with(&format!(" {phrase}"))
            })
            .then_some((*kind, inline))
    })
}

fn strip_span(line: &str, start: usize, end: usize) -> String {
    format!("{} {}", &line[..start], &line[end..])
        .trim_matches(|c: char| c.is_whitespace() || "|,-–—()[]:·•".contains(c))
        .to_string()
}

/// Split "Role at Organization" style titles
fn split_title(title: &str) -> (Option<String>, Option<String>) {
    let clean = |s: &str| {
        let s = s.trim_matches(|c: char| c.is_whitespace() || "|,-–—()".contains(c));
        (!s.is_empty()).then(|| s.to_string())
    };

    let split = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| title.find(sep).map(|idx| (idx, sep.len())))
        .min_by_key(|(idx, _)| *idx);

    match split {
        Some((idx, len)) => (clean(&title[..idx]), clean(&title[idx + len..])),
        None => (clean(title), None),
    }
}

/// "as a Data Analyst using SQL" -> "Data Analyst"
fn role_after_tenure(after: &str) -> Option<String> {
    let rest = after.trim_start();
    let lower = rest.to_ascii_lowercase();
    let rest = ["as an ", "as a ", "as "]
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .map(|prefix| &rest[prefix.len()..])?;

    let clause = rest.split(|c: char| ".,;:()\n".contains(c)).next()?;
    let words: Vec<&str> = clause
        .split_whitespace()
        .take_while(|w| !ROLE_STOP_WORDS.contains(&w.to_lowercase().as_str()))
        .take(6)
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

/// Field of study from the text following a degree mention
fn field_after_degree(rest: &str) -> Option<String> {
    let mut rest = rest.trim_start_matches(|c: char| c == '.' || c.is_whitespace());
    if rest.to_ascii_lowercase().starts_with("degree") {
        rest = rest["degree".len()..].trim_start();
    }
    if rest.starts_with(|c: char| ",|-–—(:;".contains(c)) {
        return None;
    }

    let mut clause = rest
        .split(|c: char| ".,;|()\n".contains(c) || c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    let lower = clause.to_ascii_lowercase();
    if let Some(idx) = [" at ", " from ", " - ", " – "]
        .iter()
        .filter_map(|sep| lower.find(sep))
        .min()
    {
        clause = &clause[..idx];
    }

    let padded = format!(" {}", clause);
    let lower = padded.to_ascii_lowercase();
    let field = match lower.find(" in ").or_else(|| lower.find(" of ")) {
        Some(idx) => &padded[idx + 4..],
        None => padded.as_str(),
    };

    let words: Vec<&str> = field.split_whitespace().take(6).collect();
    let field = words.join(" ");
    field.chars().any(char::is_alphabetic).then_some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> YearMonth {
        YearMonth::new(2024, 6).unwrap()
    }

    fn extract(text: &str) -> SectionExtraction {
        SectionExtractor::new().extract(text, today())
    }

    #[test]
    fn test_heading_detection() {
        assert_eq!(heading_of("EXPERIENCE").map(|h| h.0), Some(SectionType::Experience));
        assert_eq!(heading_of("Professional Experience:").map(|h| h.0), Some(SectionType::Experience));
        assert_eq!(heading_of("Education & Training").map(|h| h.0), Some(SectionType::Education));
        assert_eq!(heading_of("Technical Skills: Python, SQL"), Some((SectionType::Skills, " Python, SQL")));
        assert!(heading_of("Built a skills matrix for five hundred engineers").is_none());
        assert!(heading_of("2019 Experience").is_none());
    }

    #[test]
    fn test_experience_entries_with_titles() {
        let text = "\
Jane Roe
EXPERIENCE
Senior Data Analyst at Acme Corp
Jan 2020 - Dec 2022
- Built dashboards in Tableau
Data Analyst, Initech
Mar 2017 - Dec 2019
- Wrote SQL reports
EDUCATION
B.S. Statistics, State University, 2016";

        let result = extract(text);

        assert_eq!(result.experience.len(), 2);
        let first = &result.experience[0];
        assert_eq!(first.role.as_deref(), Some("Senior Data Analyst"));
        assert_eq!(first.organization.as_deref(), Some("Acme Corp"));
        assert_eq!(first.duration_months, Some(36));
        assert!(first.raw_segment.contains("Tableau"));
        assert!(!first.raw_segment.contains("Initech"));

        let second = &result.experience[1];
        assert_eq!(second.role.as_deref(), Some("Data Analyst"));
        assert_eq!(second.organization.as_deref(), Some("Initech"));
        assert_eq!(second.duration_months, Some(34));

        assert_eq!(result.detected_sections, vec![SectionType::Experience, SectionType::Education]);
    }

    #[test]
    fn test_title_on_date_line() {
        let result = extract("Experience\nBackend Engineer | Globex (2018 - 2021)\n- Rust services");

        assert_eq!(result.experience.len(), 1);
        assert_eq!(result.experience[0].role.as_deref(), Some("Backend Engineer"));
        assert_eq!(result.experience[0].organization.as_deref(), Some("Globex"));
        assert_eq!(result.experience[0].duration_months, Some(36));
    }

    #[test]
    fn test_title_after_date_line() {
        let result = extract("Work History\n2015 - 2018\nSupport Technician - Hooli\n- Tickets");

        assert_eq!(result.experience[0].role.as_deref(), Some("Support Technician"));
        assert_eq!(result.experience[0].organization.as_deref(), Some("Hooli"));
    }

    #[test]
    fn test_unresolved_dates_kept_with_unknown_duration() {
        let result = extract("Experience\nConsultant, Freelance\n2019 - TBD");

        assert_eq!(result.experience.len(), 1);
        assert_eq!(result.experience[0].duration_months, None);
    }

    #[test]
    fn test_tenure_statement_fallback() {
        let result = extract("Seasoned professional with 7+ years of experience as a Project Manager in construction.");

        assert_eq!(result.experience.len(), 1);
        let record = &result.experience[0];
        assert_eq!(record.duration_months, Some(84));
        assert_eq!(record.role.as_deref(), Some("Project Manager"));
        assert!(record.date_range.is_none());
    }

    #[test]
    fn test_tenure_takes_longest_statement() {
        let result = extract("Three years experience in retail.\nTen years of management experience.");

        assert_eq!(result.experience[0].duration_months, Some(120));
    }

    #[test]
    fn test_no_experience_found() {
        let result = extract("Enthusiastic gardener who enjoys hiking.");

        assert!(result.experience.is_empty());
        assert!(result.education.is_empty());
    }

    #[test]
    fn test_education_records() {
        let text = "\
Education
Master's degree in Statistics
Stanford University
Bachelor of Arts in History, Reed College
High School Diploma";

        let result = extract(text);

        assert_eq!(result.education.len(), 3);
        assert_eq!(result.education[0].degree_level, DegreeLevel::Master);
        assert_eq!(result.education[0].field.as_deref(), Some("Statistics"));
        assert_eq!(result.education[0].institution.as_deref(), Some("Stanford University"));
        assert_eq!(result.education[1].degree_level, DegreeLevel::Bachelor);
        assert_eq!(result.education[1].field.as_deref(), Some("History"));
        assert_eq!(result.education[1].institution.as_deref(), Some("Reed College"));
        assert_eq!(result.education[2].degree_level, DegreeLevel::None);
        assert!(result.education[2].field.is_none());
    }

    #[test]
    fn test_education_without_heading() {
        let result = extract("Alex Kim\nPh.D. in Physics from MIT Institute of Technology");

        assert_eq!(result.education.len(), 1);
        assert_eq!(result.education[0].degree_level, DegreeLevel::Doctorate);
        assert_eq!(result.education[0].field.as_deref(), Some("Physics"));
        assert_eq!(result.education[0].institution.as_deref(), Some("MIT Institute of Technology"));
    }

    #[test]
    fn test_headingless_degree_dates_are_not_experience() {
        let result = extract(
            "Jane Roe\nData Analyst, Acme 2018 - 2020\nB.S. Statistics, State University 2014 - 2018",
        );

        assert_eq!(result.experience.len(), 1);
        assert_eq!(result.experience[0].role.as_deref(), Some("Data Analyst"));
        assert_eq!(result.experience[0].duration_months, Some(24));
        assert_eq!(result.education.len(), 1);
        assert_eq!(result.education[0].degree_level, DegreeLevel::Bachelor);
    }

    #[test]
    fn test_scrum_master_is_not_education() {
        let result = extract("Certified Scrum Master leading agile teams");

        assert!(result.education.is_empty());
    }

    #[test]
    fn test_summary_section_and_fallback() {
        let with_section = extract("Summary\nAnalyst with a passion for data.\nExperience\n2019 - 2020 Analyst");
        assert_eq!(with_section.summary.as_deref(), Some("Analyst with a passion for data."));

        let fallback = extract("Jane Roe\nDetail-oriented analyst who turns messy data into clear stories.\n");
        assert_eq!(
            fallback.summary.as_deref(),
            Some("Detail-oriented analyst who turns messy data into clear stories.")
        );
    }

    #[test]
    fn test_split_title() {
        assert_eq!(
            split_title("Engineer @ Initech"),
            (Some("Engineer".to_string()), Some("Initech".to_string()))
        );
        assert_eq!(split_title("Engineer"), (Some("Engineer".to_string()), None));
    }
}
