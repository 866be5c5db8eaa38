use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use job_finder::config::Config;
use job_finder::jobs::snapshots::SnapshotWriter;
use job_finder::jobs::sources::{FileJobSource, HttpJobSource, JobSource};
use job_finder::models::SearchCriteria;
use job_finder::{build_pipeline, init_tracing};

/// Job Search - fetch job listings and keep the ones relevant to a profile
#[derive(Parser)]
#[command(name = "job-search")]
#[command(about = "Scrape, normalize and relevance-filter job listings", long_about = None)]
struct Cli {
    /// Position to search for, e.g. "Python Developer"
    #[arg(long)]
    position: String,

    /// Candidate experience, e.g. "2 years"
    #[arg(long)]
    experience: String,

    /// Expected salary, free text
    #[arg(long)]
    salary: Option<String>,

    /// Preferred job nature, e.g. "onsite" or "remote"
    #[arg(long)]
    job_nature: Option<String>,

    /// Location to search in
    #[arg(long)]
    location: String,

    /// Comma-separated skills
    #[arg(long)]
    skills: String,

    /// Number of raw listings to request from the scraper
    #[arg(long, default_value = "10")]
    results_wanted: u32,

    /// Read raw listings from a saved JSON file instead of the scraper service
    #[arg(long)]
    raw_input: Option<PathBuf>,

    /// Directory for CSV/JSON snapshots
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

impl Cli {
    fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            position: self.position.clone(),
            experience: self.experience.clone(),
            salary: self.salary.clone(),
            job_nature: self.job_nature.clone(),
            location: self.location.clone(),
            skills: self.skills.clone(),
        }
    }

    /// `--results-wanted` overrides the configured count; the age limit
    /// always comes from `HOURS_OLD`.
    fn limits(&self, config: &Config) -> (u32, u32) {
        (self.results_wanted, config.hours_old)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config.rust_log);

    let source: Arc<dyn JobSource> = match &cli.raw_input {
        Some(path) => Arc::new(FileJobSource::new(path)),
        None => Arc::new(
            HttpJobSource::new(config.job_source_url.clone())
                .context("Failed to build job source client")?,
        ),
    };

    let pipeline = build_pipeline(
        &config,
        source,
        Some(SnapshotWriter::new(cli.output_dir.clone())),
    )?;
    let (results_wanted, hours_old) = cli.limits(&config);
    let pipeline = pipeline.with_limits(results_wanted, hours_old);

    info!("Starting job search...");
    let results = match pipeline.run(&cli.criteria()).await {
        Ok(results) => results,
        Err(e) => {
            error!("Job search failed: {e}");
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
