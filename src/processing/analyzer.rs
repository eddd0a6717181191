//! Analysis engine: extraction, per-category matching and score aggregation

use crate::config::{AnalysisConfig, CategoryWeights};
use crate::error::{Result, ResumeMatcherError};
use crate::processing::dates::YearMonth;
use crate::processing::degrees::DegreeLevel;
use crate::processing::keywords::{stem_set, KeywordExtractor, KeywordSet};
use crate::processing::matcher::{self, Category, CategoryResult};
use crate::processing::requirements::{DegreeRequirement, ExperienceRequirement, RequirementParser};
use crate::processing::sections::{EducationRecord, ExperienceRecord, SectionExtractor, SectionType};
use crate::processing::skill_extractor::{SkillExtractor, SkillSet};
use crate::processing::text_processor::{ContactInfo, TextProcessor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Sub-score below which the missing skills are called out
const SKILLS_RECOMMENDATION_THRESHOLD: f64 = 60.0;
/// Sub-score below which keyword coverage is called out
const KEYWORDS_RECOMMENDATION_THRESHOLD: f64 = 50.0;
const MAX_LISTED_GAPS: usize = 3;

/// Signals extracted from a resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub skills: SkillSet,
    pub experience: Vec<ExperienceRecord>,
    pub education: Vec<EducationRecord>,
    pub contact: ContactInfo,
    pub summary: Option<String>,
    pub total_experience_months: u32,
    pub unknown_duration_entries: usize,
    pub highest_degree: DegreeLevel,
    pub detected_sections: Vec<SectionType>,
}

/// Signals extracted from a job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirements {
    pub skills: SkillSet,
    pub keywords: KeywordSet,
    pub experience: Option<ExperienceRequirement>,
    pub degree: Option<DegreeRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Rounded weighted mean of the category sub-scores, 0 to 100
    pub overall_score: u8,
    pub categories: BTreeMap<Category, CategoryResult>,
    pub weights: CategoryWeights,
    pub resume_profile: ResumeProfile,
    pub job_requirements: JobRequirements,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl MatchReport {
    pub fn category(&self, category: Category) -> Option<&CategoryResult> {
        self.categories.get(&category)
    }

    pub fn sub_score(&self, category: Category) -> f64 {
        self.category(category).map_or(0.0, |result| result.sub_score)
    }
}

/// Compiled analysis configuration.
///
/// Building the engine validates the configuration and compiles the skill
/// automaton once; the engine is immutable afterwards and can be shared
/// across threads.
pub struct AnalysisEngine {
    processor: TextProcessor,
    skill_extractor: SkillExtractor,
    section_extractor: SectionExtractor,
    keyword_extractor: KeywordExtractor,
    requirement_parser: RequirementParser,
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let processor = TextProcessor::with_stop_words(config.stopword_list.clone());
        let skill_extractor = SkillExtractor::new(&config.skill_taxonomy, &processor)?;
        let keyword_extractor = KeywordExtractor::new(config.keyword_top_n)?;

        log::debug!(
            "Analysis engine ready: {} skill patterns, top {} keywords",
            skill_extractor.pattern_count(),
            keyword_extractor.top_n()
        );

        Ok(Self {
            processor,
            skill_extractor,
            section_extractor: SectionExtractor::new(),
            keyword_extractor,
            requirement_parser: RequirementParser::new(),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Score a resume against a job description
    pub fn analyze(&self, resume_text: &str, job_text: &str) -> Result<MatchReport> {
        if resume_text.trim().is_empty() && job_text.trim().is_empty() {
            return Err(ResumeMatcherError::EmptyInput);
        }
        let start_time = Instant::now();

        let resume_profile = self.profile_resume(resume_text, self.config.today());
        let job_requirements = self.parse_job(job_text);
        let resume_stems = stem_set(&self.processor.normalize(resume_text));

        let results = [
            matcher::match_skills(&resume_profile.skills, &job_requirements.skills),
            matcher::match_experience(&resume_profile.experience, job_requirements.experience.as_ref()),
            matcher::match_education(&resume_profile.education, job_requirements.degree.as_ref()),
            matcher::match_keywords(&job_requirements.keywords, &resume_stems),
        ];
        let categories: BTreeMap<Category, CategoryResult> =
            results.into_iter().map(|result| (result.category, result)).collect();

        let weights = self.config.category_weights;
        let overall_score = aggregate(&categories, &weights);
        let recommendations = recommendations(&categories, &resume_profile, &job_requirements);

        log::debug!(
            "Analysis finished in {} ms: overall {}",
            start_time.elapsed().as_millis(),
            overall_score
        );

        Ok(MatchReport {
            overall_score,
            categories,
            weights,
            resume_profile,
            job_requirements,
            recommendations,
            generated_at: Utc::now(),
        })
    }

    /// Extract every resume-side signal
    pub fn profile_resume(&self, text: &str, today: YearMonth) -> ResumeProfile {
        let normalized = self.processor.normalize(text);
        let sections = self.section_extractor.extract(text, today);

        ResumeProfile {
            skills: self.skill_extractor.extract(&normalized),
            total_experience_months: matcher::total_experience_months(&sections.experience),
            unknown_duration_entries: matcher::unknown_duration_count(&sections.experience),
            highest_degree: matcher::highest_degree(&sections.education),
            contact: self.processor.extract_contact_info(text),
            experience: sections.experience,
            education: sections.education,
            summary: sections.summary,
            detected_sections: sections.detected_sections,
        }
    }

    /// Extract every job-side signal
    pub fn parse_job(&self, text: &str) -> JobRequirements {
        let normalized = self.processor.normalize(text);
        let parsed = self.requirement_parser.parse(
            text,
            &self.processor,
            &self.config.requirement_overrides,
        );

        JobRequirements {
            skills: self.skill_extractor.extract(&normalized),
            keywords: self
                .keyword_extractor
                .extract(&normalized, self.config.reference_corpus.as_ref()),
            experience: parsed.experience,
            degree: parsed.degree,
        }
    }
}

/// One-shot analysis with a fresh engine
pub fn analyze(resume_text: &str, job_text: &str, config: &AnalysisConfig) -> Result<MatchReport> {
    AnalysisEngine::new(config.clone())?.analyze(resume_text, job_text)
}

/// Weighted mean of the sub-scores, rounded and clamped to 0..=100
pub fn aggregate(categories: &BTreeMap<Category, CategoryResult>, weights: &CategoryWeights) -> u8 {
    let total: f64 = categories
        .values()
        .map(|result| weights.get(result.category) * result.sub_score)
        .sum();
    total.round().clamp(0.0, 100.0) as u8
}

fn recommendations(
    categories: &BTreeMap<Category, CategoryResult>,
    profile: &ResumeProfile,
    job: &JobRequirements,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(skills) = categories.get(&Category::Skills) {
        if skills.sub_score < SKILLS_RECOMMENDATION_THRESHOLD && !skills.missing_items.is_empty() {
            let missing: Vec<&str> = skills.missing_items.iter().map(String::as_str).collect();
            recommendations.push(format!(
                "Skills gap identified. Missing {} key skills: {}{}",
                missing.len(),
                missing[..missing.len().min(MAX_LISTED_GAPS)].join(", "),
                if missing.len() > MAX_LISTED_GAPS { "..." } else { "" }
            ));
        }
    }

    if let Some(requirement) = &job.experience {
        if profile.total_experience_months < requirement.months {
            let gap = f64::from(requirement.months - profile.total_experience_months) / 12.0;
            recommendations.push(format!("Experience gap: {:.1} years below requirement", gap));
        }
    }

    if let Some(requirement) = &job.degree {
        if profile.highest_degree < requirement.level {
            recommendations.push(format!(
                "Education level may not meet job requirements ({} degree required)",
                requirement.level
            ));
        }
    }

    if let Some(keywords) = categories.get(&Category::Keywords) {
        if keywords.sub_score < KEYWORDS_RECOMMENDATION_THRESHOLD {
            let missing: Vec<&str> = job
                .keywords
                .iter()
                .filter(|k| keywords.missing_items.contains(&k.term))
                .map(|k| k.term.as_str())
                .take(MAX_LISTED_GAPS)
                .collect();
            recommendations.push(format!(
                "Resume could better match job description keywords such as {}",
                missing.join(", ")
            ));
        }
    }

    if recommendations.is_empty() {
        recommendations.push("Strong candidate match across all criteria".to_string());
    }
    recommendations
}
