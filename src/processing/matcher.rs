//! Per-category comparison of resume signals against job requirements

use crate::processing::degrees::DegreeLevel;
use crate::processing::keywords::KeywordSet;
use crate::processing::requirements::{DegreeRequirement, ExperienceRequirement};
use crate::processing::sections::{EducationRecord, ExperienceRecord};
use crate::processing::skill_extractor::SkillSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Points lost per degree rung below the requirement
const EDUCATION_STEP_PENALTY: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Skills,
    Experience,
    Education,
    Keywords,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Skills,
        Category::Experience,
        Category::Education,
        Category::Keywords,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Skills => "skills",
            Category::Experience => "experience",
            Category::Education => "education",
            Category::Keywords => "keywords",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one category comparison.
///
/// `matched_items` and `missing_items` are disjoint and both drawn from the
/// job-description side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    /// 0 to 100
    pub sub_score: f64,
    pub matched_items: BTreeSet<String>,
    pub missing_items: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl CategoryResult {
    fn new(category: Category, sub_score: f64) -> Self {
        Self {
            category,
            sub_score: sub_score.clamp(0.0, 100.0),
            matched_items: BTreeSet::new(),
            missing_items: BTreeSet::new(),
            notes: Vec::new(),
        }
    }

    /// File a job-side item as matched or missing
    fn record(&mut self, item: String, met: bool) {
        if met {
            self.matched_items.insert(item);
        } else {
            self.missing_items.insert(item);
        }
    }
}

pub fn match_skills(resume: &SkillSet, job: &SkillSet) -> CategoryResult {
    if job.is_empty() {
        return CategoryResult::new(Category::Skills, 100.0);
    }

    let matched = resume.intersection(job);
    let sub_score = 100.0 * matched.len() as f64 / job.len() as f64;

    let mut result = CategoryResult::new(Category::Skills, sub_score);
    result.missing_items = job.difference(resume);
    result.matched_items = matched;
    result
}

/// Weighted share of job keywords whose stem appears in the resume
pub fn match_keywords(job: &KeywordSet, resume_stems: &HashSet<String>) -> CategoryResult {
    let total = job.total_weight();
    let matched_weight: f64 = job
        .iter()
        .filter(|k| resume_stems.contains(&k.stem))
        .map(|k| k.weight)
        .sum();

    let sub_score = if total > 0.0 {
        100.0 * matched_weight / total
    } else {
        100.0
    };

    let mut result = CategoryResult::new(Category::Keywords, sub_score);
    for keyword in job.iter() {
        result.record(keyword.term.clone(), resume_stems.contains(&keyword.stem));
    }
    result
}

/// Sum of the known durations, saturating at `u32::MAX`
pub fn total_experience_months(records: &[ExperienceRecord]) -> u32 {
    records
        .iter()
        .filter_map(|r| r.duration_months)
        .fold(0u32, u32::saturating_add)
}

pub fn unknown_duration_count(records: &[ExperienceRecord]) -> usize {
    records.iter().filter(|r| r.duration_months.is_none()).count()
}

pub fn match_experience(
    records: &[ExperienceRecord],
    requirement: Option<&ExperienceRequirement>,
) -> CategoryResult {
    let have = total_experience_months(records);

    let mut result = match requirement {
        Some(requirement) if requirement.months > 0 => {
            let met = have >= requirement.months;
            let sub_score = if met {
                100.0
            } else {
                100.0 * f64::from(have) / f64::from(requirement.months)
            };
            let mut result = CategoryResult::new(Category::Experience, sub_score);
            result.record(requirement.statement.clone(), met);
            result
        }
        Some(requirement) => {
            let mut result = CategoryResult::new(Category::Experience, 100.0);
            result.record(requirement.statement.clone(), true);
            result
        }
        None => CategoryResult::new(Category::Experience, 100.0),
    };

    if records.is_empty() {
        result.notes.push("No experience entries found in resume".to_string());
    }
    let unknown = unknown_duration_count(records);
    if unknown > 0 {
        log::warn!("{} experience entries have unparseable date ranges", unknown);
        result.notes.push(format!(
            "{} experience {} with unknown duration excluded from the total",
            unknown,
            if unknown == 1 { "entry" } else { "entries" }
        ));
    }
    result
}

/// Highest degree level across the records, `None` without records
pub fn highest_degree(records: &[EducationRecord]) -> DegreeLevel {
    records
        .iter()
        .map(|r| r.degree_level)
        .max()
        .unwrap_or(DegreeLevel::None)
}

pub fn match_education(
    records: &[EducationRecord],
    requirement: Option<&DegreeRequirement>,
) -> CategoryResult {
    let highest = highest_degree(records);

    let mut result = match requirement {
        Some(requirement) => {
            let met = highest >= requirement.level;
            let sub_score = if met {
                100.0
            } else {
                let distance = highest.steps_below(requirement.level);
                (100.0 - EDUCATION_STEP_PENALTY * f64::from(distance)).max(0.0)
            };
            let mut result = CategoryResult::new(Category::Education, sub_score);
            result.record(requirement.statement.clone(), met);
            result
        }
        None => CategoryResult::new(Category::Education, 100.0),
    };

    if records.is_empty() {
        result.notes.push("No education entries found in resume".to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::keywords::KeywordExtractor;
    use crate::processing::text_processor::TextProcessor;

    fn skills(names: &[&str]) -> SkillSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn experience(months: Option<u32>) -> ExperienceRecord {
        ExperienceRecord {
            role: Some("Analyst".to_string()),
            organization: None,
            duration_months: months,
            date_range: None,
            raw_segment: String::new(),
        }
    }

    fn education(level: DegreeLevel) -> EducationRecord {
        EducationRecord {
            degree_level: level,
            field: None,
            institution: None,
            raw_segment: String::new(),
        }
    }

    fn degree_requirement(level: DegreeLevel) -> DegreeRequirement {
        DegreeRequirement {
            level,
            statement: format!("{} required", level),
        }
    }

    #[test]
    fn test_skill_match() {
        let result = match_skills(&skills(&["Python", "SQL", "Tableau"]), &skills(&["Python", "SQL", "Excel"]));

        assert!((result.sub_score - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            result.matched_items,
            ["Python", "SQL"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>()
        );
        assert_eq!(result.missing_items, BTreeSet::from(["Excel".to_string()]));
        assert!(result.matched_items.is_disjoint(&result.missing_items));
    }

    #[test]
    fn test_no_job_skills_scores_full() {
        let result = match_skills(&skills(&[]), &skills(&[]));

        assert_eq!(result.sub_score, 100.0);
        assert!(result.missing_items.is_empty());
    }

    #[test]
    fn test_keyword_match_by_stem() {
        let processor = TextProcessor::new();
        let job = KeywordExtractor::new(30)
            .unwrap()
            .extract(&processor.normalize("forecasting forecasting dashboards"), None);
        let resume_stems = crate::processing::keywords::stem_set(&processor.normalize("Built forecast models"));

        let result = match_keywords(&job, &resume_stems);

        assert!((result.sub_score - 200.0 / 3.0).abs() < 1e-9);
        assert!(result.matched_items.contains("forecasting"));
        assert!(result.missing_items.contains("dashboards"));
    }

    #[test]
    fn test_empty_keywords_score_full() {
        let result = match_keywords(&KeywordSet::default(), &HashSet::new());

        assert_eq!(result.sub_score, 100.0);
    }

    #[test]
    fn test_experience_met_and_short() {
        let requirement = ExperienceRequirement {
            months: 36,
            statement: "3+ years".to_string(),
        };

        let met = match_experience(&[experience(Some(60))], Some(&requirement));
        assert_eq!(met.sub_score, 100.0);
        assert!(met.matched_items.contains("3+ years"));

        let short = match_experience(&[experience(Some(18))], Some(&requirement));
        assert_eq!(short.sub_score, 50.0);
        assert!(short.missing_items.contains("3+ years"));

        let none = match_experience(&[], Some(&requirement));
        assert_eq!(none.sub_score, 0.0);
        assert_eq!(none.notes.len(), 1);
    }

    #[test]
    fn test_unknown_durations_excluded_and_noted() {
        let records = [experience(Some(12)), experience(None)];
        let requirement = ExperienceRequirement {
            months: 24,
            statement: "2 years".to_string(),
        };

        let result = match_experience(&records, Some(&requirement));

        assert_eq!(total_experience_months(&records), 12);
        assert_eq!(result.sub_score, 50.0);
        assert!(result.notes[0].contains("unknown duration"));
    }

    #[test]
    fn test_total_months_saturate() {
        let records = [experience(Some(u32::MAX - 5)), experience(Some(120)), experience(Some(12))];

        assert_eq!(total_experience_months(&records), u32::MAX);
    }

    #[test]
    fn test_no_experience_requirement() {
        let result = match_experience(&[], None);

        assert_eq!(result.sub_score, 100.0);
        assert!(result.matched_items.is_empty() && result.missing_items.is_empty());
    }

    #[test]
    fn test_education_distance() {
        let bachelor = degree_requirement(DegreeLevel::Bachelor);

        assert_eq!(match_education(&[education(DegreeLevel::Master)], Some(&bachelor)).sub_score, 100.0);
        assert_eq!(match_education(&[education(DegreeLevel::Associate)], Some(&bachelor)).sub_score, 75.0);
        assert_eq!(match_education(&[], Some(&bachelor)).sub_score, 50.0);
        assert_eq!(match_education(&[education(DegreeLevel::Unknown)], Some(&bachelor)).sub_score, 50.0);

        let doctorate = degree_requirement(DegreeLevel::Doctorate);
        assert_eq!(match_education(&[], Some(&doctorate)).sub_score, 0.0);
    }

    #[test]
    fn test_highest_degree_counts() {
        let records = [education(DegreeLevel::Bachelor), education(DegreeLevel::Doctorate)];

        assert_eq!(highest_degree(&records), DegreeLevel::Doctorate);
        assert_eq!(highest_degree(&[]), DegreeLevel::None);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Keywords).unwrap(), "\"keywords\"");
    }
}
