//! Output formatters for match reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeMatcherError};
use crate::processing::analyzer::MatchReport;
use crate::processing::matcher::{Category, CategoryResult};
use colored::{Color, Colorize};
use std::path::Path;

/// Items listed per category before eliding the rest
const MAX_LISTED_ITEMS: usize = 8;

pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Human-readable console report
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    include_recommendations: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

/// Picks the formatter for the requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
            include_recommendations: true,
        }
    }

    pub fn with_recommendations(mut self, include: bool) -> Self {
        self.include_recommendations = include;
        self
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_category(&self, result: &CategoryResult, weight: f64) -> String {
        let mut output = format!(
            "{:<11} {:>5.1}%  (weight {:.0}%)\n",
            title_case(result.category),
            result.sub_score,
            weight * 100.0
        );

        if !result.matched_items.is_empty() {
            output.push_str(&format!(
                "    {} {}\n",
                self.colorize("matched:", Color::Green),
                list_items(result.matched_items.iter())
            ));
        }
        if !result.missing_items.is_empty() {
            output.push_str(&format!(
                "    {} {}\n",
                self.colorize("missing:", Color::Red),
                list_items(result.missing_items.iter())
            ));
        }
        for note in &result.notes {
            output.push_str(&format!("    {} {}\n", self.colorize("note:", Color::Yellow), note));
        }
        output
    }

    fn format_profile(&self, report: &MatchReport) -> String {
        let profile = &report.resume_profile;
        let mut output = self.format_header("Resume Profile", 3);

        if let Some(email) = &profile.contact.email {
            output.push_str(&format!("Email: {}\n", email));
        }
        if let Some(phone) = &profile.contact.phone {
            output.push_str(&format!("Phone: {}\n", phone));
        }
        if let Some(linkedin) = &profile.contact.linkedin {
            output.push_str(&format!("LinkedIn: {}\n", linkedin));
        }
        if let Some(summary) = &profile.summary {
            output.push_str(&format!("Summary: {}\n", summary));
        }

        output.push_str(&format!(
            "Experience: {:.1} years across {} entries\n",
            f64::from(profile.total_experience_months) / 12.0,
            profile.experience.len()
        ));
        for record in &profile.experience {
            let role = record.role.as_deref().unwrap_or("(unknown role)");
            let organization = record
                .organization
                .as_deref()
                .map(|org| format!(" @ {}", org))
                .unwrap_or_default();
            let duration = record
                .duration_months
                .map(|m| format!("{} months", m))
                .unwrap_or_else(|| "unknown duration".to_string());
            output.push_str(&format!("  • {}{} ({})\n", role, organization, duration));
        }

        output.push_str(&format!("Highest degree: {}\n", profile.highest_degree));
        for record in &profile.education {
            let field = record.field.as_deref().map(|f| format!(" in {}", f)).unwrap_or_default();
            let institution = record
                .institution
                .as_deref()
                .map(|i| format!(", {}", i))
                .unwrap_or_default();
            output.push_str(&format!("  • {}{}{}\n", record.degree_level, field, institution));
        }

        let keywords = &report.job_requirements.keywords;
        if !keywords.is_empty() {
            output.push_str(&format!("Top job keywords: {}\n", list_items(keywords.terms().into_iter())));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH REPORT", 1));
        output.push_str(&format!(
            "Generated: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.format_header("Overall", 2));
        output.push_str(&format!(
            "Overall Score: {}% {}\n",
            report.overall_score,
            self.format_score_badge(report.overall_score)
        ));

        output.push_str(&self.format_header("Score Breakdown", 3));
        for category in Category::ALL {
            if let Some(result) = report.category(category) {
                output.push_str(&self.format_category(result, report.weights.get(category)));
            }
        }

        if self.include_recommendations && !report.recommendations.is_empty() {
            output.push_str(&self.format_header("Recommendations", 3));
            for recommendation in &report.recommendations {
                output.push_str(&format!("  • {}\n", self.colorize(recommendation, Color::Cyan)));
            }
        }

        if self.detailed {
            output.push_str(&self.format_profile(report));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        include_recommendations: bool,
        pretty_json: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed)
                .with_recommendations(include_recommendations),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content).map_err(|e| {
        ResumeMatcherError::OutputFormatting(format!(
            "Failed to write report to '{}': {}",
            file_path.display(),
            e
        ))
    })
}

/// Default report file name derived from the resume file name
pub fn suggest_filename(format: OutputFormat, resume_name: &str) -> String {
    let stem = Path::new(resume_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("resume");
    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
    };
    format!("{}_match_report.{}", stem, extension)
}

fn title_case(category: Category) -> String {
    let name = category.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn list_items<I>(items: I) -> String
where
    I: ExactSizeIterator,
    I::Item: AsRef<str>,
{
    let total = items.len();
    let shown: Vec<String> = items
        .take(MAX_LISTED_ITEMS)
        .map(|item| item.as_ref().to_string())
        .collect();
    if total > MAX_LISTED_ITEMS {
        format!("{} (+{} more)", shown.join(", "), total - MAX_LISTED_ITEMS)
    } else {
        shown.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::processing::analyzer::analyze;

    fn report() -> MatchReport {
        analyze(
            "Jane Roe | jane@example.com\nExperience\nData Analyst, Acme\n2018 - 2022\nSkills: Python, SQL",
            "Data Analyst with 3+ years experience. Python, SQL and Tableau required.",
            &AnalysisConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_console_plain_output() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_report(&report()).unwrap();

        assert!(output.contains("RESUME MATCH REPORT"));
        assert!(output.contains("Overall Score:"));
        assert!(output.contains("missing: Tableau"));
        assert!(output.contains("Email: jane@example.com"));
        assert!(output.contains("Data Analyst @ Acme (48 months)"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_console_without_recommendations() {
        let formatter = ConsoleFormatter::new(false, false).with_recommendations(false);
        let output = formatter.format_report(&report()).unwrap();

        assert!(!output.contains("Recommendations"));
        assert!(!output.contains("Resume Profile"));
    }

    #[test]
    fn test_json_output_parses() {
        let output = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(value["overall_score"].is_u64());
        assert_eq!(value["categories"]["skills"]["missing_items"][0], "Tableau");
    }

    #[test]
    fn test_generator_routes_by_format() {
        let generator = ReportGenerator::with_options(false, false, true, true);
        let report = report();

        assert!(generator.generate_report(&report, OutputFormat::Json).unwrap().starts_with('{'));
        assert!(generator
            .generate_report(&report, OutputFormat::Console)
            .unwrap()
            .contains("Score Breakdown"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Json, "cv/jane.pdf"), "jane_match_report.json");
        assert_eq!(suggest_filename(OutputFormat::Console, ""), "resume_match_report.txt");
    }
}
