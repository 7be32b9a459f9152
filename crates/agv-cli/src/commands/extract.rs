//! Extract command - run the tool loop over documents or scrape a vendor site.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use agv_core::models::config::LlmBackend;
use agv_core::{
    AgvConfig, CanonicalSpec, ExtractionToolbox, Orchestrator, RunOutcome, ScrapeReport,
    VendorScraper, is_url, iter_inputs, load_document, oracle_for,
};

use super::load_config;
use crate::output::{row_spec, write_record_table, write_spec_table};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Path to a .pdf/.txt file or folder, or a vendor products URL
    #[arg(short, long)]
    input: String,

    /// Output CSV path
    #[arg(short, long, default_value = "specs.csv")]
    output: PathBuf,

    /// Stop threshold [0..1] (overrides config)
    #[arg(long)]
    min_completeness: Option<f64>,

    /// Max tool attempts per document (overrides config)
    #[arg(long)]
    max_steps: Option<usize>,

    /// LLM backend for fallback extraction (overrides config)
    #[arg(long, value_enum)]
    llm: Option<LlmChoice>,

    /// Number of documents processed in parallel
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LlmChoice {
    /// Skip the model-assisted tool
    None,
    /// OpenAI chat completions (needs OPENAI_API_KEY)
    Openai,
    /// Local HTTP endpoint (LOCAL_LLM_URL)
    Local,
}

impl From<LlmChoice> for LlmBackend {
    fn from(choice: LlmChoice) -> Self {
        match choice {
            LlmChoice::None => LlmBackend::None,
            LlmChoice::Openai => LlmBackend::OpenAi,
            LlmChoice::Local => LlmBackend::Local,
        }
    }
}

/// Outcome of one input file.
struct DocumentResult {
    index: usize,
    path: PathBuf,
    outcome: Result<RunOutcome, String>,
}

fn apply_overrides(mut config: AgvConfig, args: &ExtractArgs) -> anyhow::Result<AgvConfig> {
    if let Some(threshold) = args.min_completeness {
        config.orchestration.min_completeness = threshold;
    }
    if let Some(steps) = args.max_steps {
        config.orchestration.max_steps = steps;
    }
    if let Some(llm) = args.llm {
        config.llm.backend = llm.into();
    }
    config.validate()?;
    Ok(config)
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = apply_overrides(load_config(config_path)?, &args)?;

    if is_url(&args.input) {
        info!("URL input detected -> using web scraper: {}", args.input);
        return scrape(&args, config).await;
    }

    extract_documents(&args, config).await
}

async fn scrape(args: &ExtractArgs, config: AgvConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    let url = args.input.clone();
    let scrape_config = config.scrape;

    let report: ScrapeReport = tokio::task::spawn_blocking(move || {
        VendorScraper::new(scrape_config).map(|scraper| scraper.scrape(&url))
    })
    .await??;

    let columns = write_record_table(&args.output, &report.records)?;

    println!(
        "{} Scraped {} devices in {:?}",
        style("✓").green(),
        report.records.len(),
        start.elapsed()
    );
    println!(
        "   {} rows, {} columns written to {}",
        report.records.len(),
        columns,
        args.output.display()
    );

    if !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed pages:").red());
        for failure in &report.failures {
            println!("  - {}: {}", failure.url, failure.error);
        }
    }

    Ok(())
}

async fn extract_documents(args: &ExtractArgs, config: AgvConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    let files = iter_inputs(Path::new(&args.input))?;
    if files.is_empty() {
        warn!("No supported documents found in {}", args.input);
    }
    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        files.len()
    );

    let toolbox = ExtractionToolbox::new().with_oracle(oracle_for(&config.llm));
    let orchestrator = Arc::new(Orchestrator::new(
        toolbox,
        config.orchestration.min_completeness,
        config.orchestration.max_steps,
    )?);
    let engine = config.pdf.engine;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    // Bounded pool: at most `jobs` documents in flight
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let orchestrator = Arc::clone(&orchestrator);

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let outcome = load_document(&path, engine)
                .map(|doc| orchestrator.run(&doc))
                .map_err(|e| e.to_string());
            DocumentResult {
                index,
                path,
                outcome,
            }
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let result = joined?;
        if let Ok(outcome) = &result.outcome {
            debug!(
                "{}: score {:.2} after {} step(s), stop {:?}",
                result.path.display(),
                outcome.score,
                outcome.steps,
                outcome.stop
            );
        }
        results.push(result);
        pb.inc(1);
    }
    pb.finish_with_message("Complete");

    results.sort_by_key(|r| r.index);

    let (succeeded, failed): (Vec<_>, Vec<_>) =
        results.into_iter().partition(|r| r.outcome.is_ok());
    let specs: Vec<CanonicalSpec> = succeeded
        .into_iter()
        .filter_map(|r| r.outcome.ok())
        .map(row_spec)
        .collect();

    let columns = write_spec_table(&args.output, &specs)?;

    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        specs.len() + failed.len(),
        start.elapsed()
    );
    println!(
        "   {} rows, {} columns written to {}",
        style(specs.len()).green(),
        columns,
        args.output.display()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.outcome.as_ref().err().map(String::as_str).unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
