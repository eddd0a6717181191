//! Resume matcher: explainable resume and job description match scoring

use clap::Parser;
use log::{error, info, warn};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction};
use resume_matcher::input::InputManager;
use resume_matcher::output::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_matcher::processing::keywords::ReferenceCorpus;
use resume_matcher::processing::text_processor::TextProcessor;
use resume_matcher::{AnalysisEngine, Config, Result, ResumeMatcherError};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Match {
            resume,
            job,
            output,
            save,
            corpus,
            top_n,
            detailed,
        } => {
            cli::validate_file_extension(&resume, cli::DOCUMENT_EXTENSIONS)
                .map_err(|e| ResumeMatcherError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, cli::DOCUMENT_EXTENSIONS)
                .map_err(|e| ResumeMatcherError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeMatcherError::InvalidInput)?,
                None => config.output.format,
            };

            let mut analysis = config.analysis.clone();
            if let Some(top_n) = top_n {
                analysis.keyword_top_n = top_n;
            }

            let mut input_manager = InputManager::new();
            let resume_doc = input_manager.load(&resume).await?;
            let job_doc = input_manager.load(&job).await?;
            info!(
                "Loaded resume ({} chars) and job description ({} chars)",
                resume_doc.text.len(),
                job_doc.text.len()
            );

            if let Some(dir) = corpus {
                let documents = input_manager.load_directory(&dir).await?;
                if documents.is_empty() {
                    warn!("Corpus directory {} has no supported documents, using term frequency only", dir.display());
                } else {
                    let processor = TextProcessor::with_stop_words(analysis.stopword_list.clone());
                    let reference =
                        ReferenceCorpus::from_texts(documents.iter().map(|d| d.text.as_str()), &processor);
                    analysis = analysis.with_reference_corpus(reference);
                }
            }

            let engine = AnalysisEngine::new(analysis)?;
            let report = engine.analyze(&resume_doc.text, &job_doc.text)?;
            info!("Overall match score: {}%", report.overall_score);

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                config.output.include_recommendations,
                true,
            );
            let content = generator.generate_report(&report, output_format)?;

            match save {
                Some(target) => {
                    let target = report_path(target, output_format, &resume);
                    save_report_to_file(&content, &target)?;
                    info!("Report saved to {}", target.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("# {}\n{}", config_path.display(), rendered);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                info!("Configuration reset to defaults at {}", config_path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

/// A directory target gets a file name derived from the resume
fn report_path(target: PathBuf, format: resume_matcher::config::OutputFormat, resume: &Path) -> PathBuf {
    if target.is_dir() {
        let resume_name = resume.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        target.join(suggest_filename(format, resume_name))
    } else {
        target
    }
}
