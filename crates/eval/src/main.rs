//! Evaluation CLI for exercising the candidate ranking pipeline.
//!
//! Usage:
//!     eval rank candidates.json --requirement "Senior React developer"
//!     eval rank candidates.json --skill React --location Berlin --per-page 10
//!     eval skills candidates.json --threshold 0.85

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use talentflow_cluster::{skill_candidate_counts, ClusterConfig, SkillNormalizer};
use talentflow_explain::summarize_match;
use talentflow_ingest::parse_dataset;
use talentflow_model::{CandidateFilter, EmploymentStatus, ExperienceLevel};
use talentflow_query::{apply_filter, paginate, Page};
use talentflow_rerank::{rank, score_breakdown, ScoreWeights};

#[derive(Parser)]
#[command(name = "eval")]
#[command(about = "Evaluate candidate ranking quality")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank candidates against a job requirement
    Rank {
        /// Candidate dataset (JSON object, id -> record)
        file: PathBuf,

        /// Job requirement text
        #[arg(short, long, default_value = "")]
        requirement: String,

        /// Case-insensitive search text
        #[arg(long)]
        search: Option<String>,

        /// Canonical skill to require (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Location to require (repeatable)
        #[arg(long = "location")]
        locations: Vec<String>,

        /// Experience-level tag, e.g. "1-3 years" (repeatable)
        #[arg(long = "experience")]
        experience: Vec<String>,

        /// Employment status tag (repeatable)
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Clustering similarity threshold
        #[arg(long, default_value = "0.8")]
        threshold: f64,

        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Page size
        #[arg(long, default_value = "20")]
        per_page: usize,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show skill clusters and per-skill candidate counts
    Skills {
        /// Candidate dataset (JSON object, id -> record)
        file: PathBuf,

        /// Clustering similarity threshold
        #[arg(long, default_value = "0.8")]
        threshold: f64,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("talentflow=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank {
            file,
            requirement,
            search,
            skills,
            locations,
            experience,
            statuses,
            threshold,
            page,
            per_page,
            format,
        } => {
            let filter = build_filter(search, skills, locations, experience, statuses)?;
            run_rank(&file, &requirement, filter, threshold, page, per_page, &format)?;
        }
        Commands::Skills { file, threshold } => {
            run_skills(&file, threshold)?;
        }
    }

    Ok(())
}

fn build_filter(
    search: Option<String>,
    skills: Vec<String>,
    locations: Vec<String>,
    experience: Vec<String>,
    statuses: Vec<String>,
) -> Result<CandidateFilter> {
    let experience = experience
        .iter()
        .map(|tag| match ExperienceLevel::from_label(tag) {
            Some(level) => Ok(level),
            None => bail!("Unknown experience tag: {tag}"),
        })
        .collect::<Result<Vec<_>>>()?;

    let statuses = statuses
        .iter()
        .map(|tag| match EmploymentStatus::from_label(tag) {
            Some(status) => Ok(status),
            None => bail!("Unknown employment status: {tag}"),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut filter = CandidateFilter::new();
    filter.search = search.unwrap_or_default();
    filter.skills = skills;
    filter.location = locations;
    filter.experience = experience;
    filter.employment_status = statuses;
    Ok(filter)
}

fn run_rank(
    file: &PathBuf,
    requirement: &str,
    filter: CandidateFilter,
    threshold: f64,
    page: usize,
    per_page: usize,
    format: &str,
) -> Result<()> {
    let json = std::fs::read_to_string(file)?;
    let candidates = parse_dataset(&json)?;
    let total = candidates.len();

    let cluster_config = ClusterConfig { threshold };
    let normalizer = SkillNormalizer::from_candidates(&candidates, &cluster_config);

    let weights = ScoreWeights::default();
    let ranked = rank(candidates, requirement, &weights);
    let survivors = apply_filter(&ranked, &filter, &normalizer);
    let page_slice = paginate(&survivors, &Page::new(page, per_page))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&page_slice)?);
        return Ok(());
    }

    if !requirement.is_empty() {
        println!("Requirement: {requirement}");
        println!("---");
    }

    let offset = page.saturating_sub(1) * per_page;
    for (i, candidate) in page_slice.iter().enumerate() {
        println!("\n{}. {} ({})", offset + i + 1, candidate.name, candidate.id);
        println!("   Location: {}", candidate.location_or_unknown());

        if let Some(computed) = candidate.computed {
            println!(
                "   Score: {} | {} | {}",
                computed.score,
                computed.experience_level.label(),
                computed.employment_status.label()
            );
        }

        let breakdown = score_breakdown(candidate, requirement, &weights);
        println!("   {}", summarize_match(&breakdown));

        if !breakdown.signals.is_empty() {
            println!(
                "   Signals: {:?}",
                breakdown
                    .signals
                    .iter()
                    .map(|signal| signal.label())
                    .collect::<Vec<_>>()
            );
        }
    }

    println!("\n---");
    println!(
        "Showing {} of {} matching candidates ({} in dataset)",
        page_slice.len(),
        survivors.len(),
        total
    );

    Ok(())
}

fn run_skills(file: &PathBuf, threshold: f64) -> Result<()> {
    let json = std::fs::read_to_string(file)?;
    let candidates = parse_dataset(&json)?;

    let counts = skill_candidate_counts(&candidates);
    let normalizer =
        SkillNormalizer::from_candidates(&candidates, &ClusterConfig { threshold });

    for group in normalizer.groups() {
        println!("\n{} ({} variants)", group.representative, group.members.len());
        for member in &group.members {
            let count = counts.get(member).copied().unwrap_or(0);
            println!("   {member} - {count} candidate(s)");
        }
    }

    println!("\n---");
    println!(
        "{} raw skills in {} groups",
        normalizer.len(),
        normalizer.groups().len()
    );

    Ok(())
}
