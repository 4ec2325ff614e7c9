//! Deep-Research-RS: iterative, citation-preserving research from the command line
//!
//! This is the main entry point for the application.

use anyhow::{bail, Result};
use clap::Parser;
use deep_research_rs::{config, research::ResearchPipeline};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deep-research")]
#[command(
    version,
    about = "Decompose a topic, search it in depth and write a cited research report"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expansion rounds per sub-question
    #[arg(long)]
    max_depth: Option<usize>,

    /// Directory the artifacts are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Research topic; read from stdin when omitted
    topic: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut settings = config::load(cli.config.as_deref())?;
    if let Some(depth) = cli.max_depth {
        settings.research.max_depth = depth;
    }
    if let Some(dir) = cli.output_dir {
        settings.output.directory = dir;
    }

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting Deep-Research-RS v{}", deep_research_rs::VERSION);

    settings.validate()?;

    let topic = read_topic(cli.topic)?;
    info!("Research topic: {}", topic);

    let pipeline = ResearchPipeline::from_settings(&settings, &topic)?;
    let outcome = pipeline.run(&topic).await?;

    println!(
        "Searched {} sub-questions: {} sections ({} failed), {} citations",
        outcome.sub_questions.len(),
        outcome.sections,
        outcome.failed_sections,
        outcome.citations
    );
    println!("Report written to {}", pipeline.artifacts().report.display());

    Ok(())
}

/// Topic from the arguments, or from stdin when none were given
fn read_topic(args: Vec<String>) -> Result<String> {
    let mut topic = args.join(" ");

    if topic.trim().is_empty() {
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            eprintln!("Enter the research topic, then press Ctrl-D:");
        }
        stdin.read_to_string(&mut topic)?;
    }

    let topic = topic.trim();
    if topic.is_empty() {
        bail!("No research topic given");
    }
    Ok(topic.to_string())
}
