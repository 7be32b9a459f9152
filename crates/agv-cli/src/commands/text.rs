//! Text command - convert PDFs into `.txt` files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::warn;

use agv_core::pdf::{self, build_combined_corpus, write_pdf_text};
use agv_core::iter_inputs;

use super::load_config;

/// Arguments for the text command.
#[derive(Args)]
pub struct TextArgs {
    /// PDF file or folder of PDFs
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving one .txt per PDF
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Also write all PDFs into one combined corpus file
    #[arg(long)]
    combined: Option<PathBuf>,
}

fn pdf_inputs(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pdfs: Vec<PathBuf> = iter_inputs(input)?
        .into_iter()
        .filter(|p| pdf::is_pdf(p))
        .collect();

    if pdfs.is_empty() {
        anyhow::bail!("No PDF files found in {}", input.display());
    }
    Ok(pdfs)
}

pub async fn run(args: TextArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let engine = config.pdf.engine;

    let pdfs = pdf_inputs(&args.input)?;
    fs::create_dir_all(&args.output_dir)?;

    let mut failed = 0;
    for pdf_path in &pdfs {
        let name = pdf::file_name(pdf_path);
        let stem = pdf_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let out_txt = args.output_dir.join(format!("{}.txt", stem));

        match write_pdf_text(pdf_path, &out_txt, engine) {
            Ok(stats) => println!(
                "{} {}: {} pages, {} chars, {} words",
                style("✓").green(),
                name,
                stats.pages,
                stats.characters,
                stats.words
            ),
            Err(e) => {
                warn!("Failed to convert {}: {}", name, e);
                println!("{} {}: {}", style("✗").red(), name, e);
                failed += 1;
            }
        }
    }

    if let Some(combined_path) = &args.combined {
        let (corpus, stats) = build_combined_corpus(&pdfs, engine)?;
        if let Some(parent) = combined_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(combined_path, corpus)?;
        println!(
            "{} Combined corpus of {} files written to {}",
            style("✓").green(),
            stats.len(),
            combined_path.display()
        );
    }

    println!();
    println!(
        "   {} converted, {} failed",
        style(pdfs.len() - failed).green(),
        style(failed).red()
    );

    Ok(())
}
