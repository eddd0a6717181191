//! Skill taxonomy: canonical skill names and the surface forms that denote them

use crate::error::{Result, ResumeMatcherError};
use crate::processing::text_processor::TextProcessor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from canonical skill to its synonyms.
///
/// A skill with an empty synonym list is matched by its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillTaxonomy {
    skills: BTreeMap<String, Vec<String>>,
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        let skills = DEFAULT_SKILLS
            .iter()
            .map(|(canonical, synonyms)| {
                (
                    canonical.to_string(),
                    synonyms.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { skills }
    }
}

impl SkillTaxonomy {
    pub fn new() -> Self {
        Self {
            skills: BTreeMap::new(),
        }
    }

    /// Add or replace a skill
    pub fn with_skill<S: Into<String>>(mut self, canonical: S, synonyms: &[&str]) -> Self {
        self.insert(canonical, synonyms.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn insert<S: Into<String>>(&mut self, canonical: S, synonyms: Vec<String>) {
        self.skills.insert(canonical.into(), synonyms);
    }

    /// Surface forms for one canonical skill
    pub fn surface_forms<'a>(&'a self, canonical: &'a str) -> Vec<&'a str> {
        match self.skills.get(canonical) {
            Some(synonyms) if !synonyms.is_empty() => synonyms.iter().map(String::as_str).collect(),
            Some(_) => vec![canonical],
            None => Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec<&str>)> + '_ {
        self.skills
            .keys()
            .map(move |canonical| (canonical.as_str(), self.surface_forms(canonical)))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Check the taxonomy shape against the normalizer that will consume it.
    ///
    /// Every canonical name must be non-blank and every surface form must
    /// survive normalization with at least one token.
    pub fn validate(&self, processor: &TextProcessor) -> Result<()> {
        for (canonical, forms) in self.iter() {
            if canonical.trim().is_empty() {
                return Err(ResumeMatcherError::Configuration(
                    "Skill taxonomy contains a blank canonical skill name".to_string(),
                ));
            }

            for form in forms {
                if processor.tokenize(form).is_empty() {
                    return Err(ResumeMatcherError::Configuration(format!(
                        "Synonym '{}' of skill '{}' normalizes to no tokens",
                        form, canonical
                    )));
                }
            }
        }
        Ok(())
    }
}

const DEFAULT_SKILLS: &[(&str, &[&str])] = &[
    // Programming Languages
    ("Python", &["python", "python3"]),
    ("Java", &["java"]),
    ("JavaScript", &["javascript", "js", "ecmascript"]),
    ("TypeScript", &["typescript"]),
    ("C++", &["c++", "cpp"]),
    ("C#", &["c#", "csharp"]),
    ("Go", &["golang"]),
    ("Rust", &["rust"]),
    ("Ruby", &["ruby"]),
    ("PHP", &["php"]),
    ("Swift", &["swift"]),
    ("Kotlin", &["kotlin"]),
    ("Scala", &["scala"]),
    ("R", &["r programming", "r language", "rstudio"]),
    ("MATLAB", &["matlab"]),
    ("SQL", &["sql"]),
    ("HTML", &["html", "html5"]),
    ("CSS", &["css", "css3"]),
    // Frameworks & Libraries
    ("React", &["react", "react.js", "reactjs"]),
    ("Angular", &["angular", "angularjs"]),
    ("Vue", &["vue", "vue.js", "vuejs"]),
    ("Django", &["django"]),
    ("Flask", &["flask"]),
    ("Spring", &["spring", "spring boot", "spring framework"]),
    ("Node.js", &["node.js", "nodejs"]),
    ("Express", &["express.js", "expressjs"]),
    ("TensorFlow", &["tensorflow"]),
    ("PyTorch", &["pytorch"]),
    ("scikit-learn", &["scikit-learn", "sklearn"]),
    ("Pandas", &["pandas"]),
    ("NumPy", &["numpy"]),
    // Databases
    ("MySQL", &["mysql"]),
    ("PostgreSQL", &["postgresql", "postgres"]),
    ("MongoDB", &["mongodb", "mongo"]),
    ("Redis", &["redis"]),
    ("Elasticsearch", &["elasticsearch"]),
    ("Oracle", &["oracle"]),
    ("SQLite", &["sqlite"]),
    // Cloud & DevOps
    ("AWS", &["aws", "amazon web services"]),
    ("Azure", &["azure", "microsoft azure"]),
    ("GCP", &["gcp", "google cloud", "google cloud platform"]),
    ("Docker", &["docker"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("Jenkins", &["jenkins"]),
    ("Git", &["git"]),
    ("GitLab", &["gitlab"]),
    ("GitHub", &["github"]),
    ("Terraform", &["terraform"]),
    ("Ansible", &["ansible"]),
    ("Linux", &["linux"]),
    ("CI/CD", &["ci/cd", "continuous integration", "continuous delivery"]),
    ("Microservices", &["microservices", "microservice"]),
    ("REST APIs", &["rest api", "rest apis", "restful"]),
    ("GraphQL", &["graphql"]),
    // Data
    ("Excel", &["excel", "microsoft excel", "ms excel"]),
    ("Tableau", &["tableau"]),
    ("Power BI", &["power bi", "powerbi"]),
    ("Machine Learning", &["machine learning", "machine-learning", "ml"]),
    ("Deep Learning", &["deep learning", "deep-learning"]),
    ("Data Analysis", &["data analysis", "data analytics"]),
    ("Statistics", &["statistics", "statistical analysis"]),
    ("Spark", &["spark", "apache spark", "pyspark"]),
    ("Hadoop", &["hadoop"]),
    ("Kafka", &["kafka", "apache kafka"]),
    ("Airflow", &["airflow", "apache airflow"]),
    // Process & Tools
    ("Agile", &["agile"]),
    ("Scrum", &["scrum"]),
    ("Jira", &["jira"]),
    ("Confluence", &["confluence"]),
    // Soft skills
    ("Communication", &["communication", "communication skills"]),
    ("Leadership", &["leadership"]),
    ("Project Management", &["project management"]),
    ("Problem Solving", &["problem solving", "problem-solving"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_is_valid() {
        let taxonomy = SkillTaxonomy::default();
        let processor = TextProcessor::new();

        assert!(taxonomy.len() > 50);
        assert!(taxonomy.validate(&processor).is_ok());
    }

    #[test]
    fn test_canonical_name_used_without_synonyms() {
        let taxonomy = SkillTaxonomy::new().with_skill("Haskell", &[]);

        assert_eq!(taxonomy.surface_forms("Haskell"), vec!["Haskell"]);
        assert!(taxonomy.surface_forms("Elm").is_empty());
    }

    #[test]
    fn test_blank_canonical_rejected() {
        let taxonomy = SkillTaxonomy::new().with_skill("  ", &["x-ray"]);
        let err = taxonomy.validate(&TextProcessor::new()).unwrap_err();

        assert!(err.is_configuration());
    }

    #[test]
    fn test_stopword_only_synonym_rejected() {
        let taxonomy = SkillTaxonomy::new().with_skill("IT", &["it"]);
        let err = taxonomy.validate(&TextProcessor::new()).unwrap_err();

        assert!(err.is_configuration());
        assert!(err.to_string().contains("'it'"));
    }

    #[test]
    fn test_toml_round_trip_shape() {
        let taxonomy = SkillTaxonomy::new().with_skill("C++", &["c++", "cpp"]);
        let encoded = toml::to_string(&taxonomy).unwrap();
        let decoded: SkillTaxonomy = toml::from_str(&encoded).unwrap();

        assert_eq!(decoded, taxonomy);
    }
}
