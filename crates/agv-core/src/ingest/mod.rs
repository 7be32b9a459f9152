//! Input discovery and document loading.

#[cfg(feature = "native")]
pub mod web;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{AgvError, InputError, Result};
use crate::models::config::PdfEngine;
use crate::pdf::{self, TextStats};

/// A loaded input document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File name, used as the document identifier.
    pub id: String,
    pub text: String,
    pub stats: TextStats,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let stats = TextStats::from_text(&text, 1);
        Self {
            id: id.into(),
            text,
            stats,
        }
    }
}

/// Whether an input string is an HTTP(S) URL.
pub fn is_url(input: &str) -> bool {
    let lower = input.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Expand an input path into the documents to process.
///
/// A file yields itself. A directory yields its PDFs sorted by name, then
/// its `.txt` files that have no PDF with the same stem.
pub fn iter_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        if pdf::is_pdf(input) || pdf::is_plain_text(input) {
            return Ok(vec![input.to_path_buf()]);
        }
        warn!("Skipping unsupported: {}", input.display());
        return Ok(Vec::new());
    }

    if !input.is_dir() {
        return Err(InputError::NotFound(input.to_path_buf()).into());
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    let pdfs: Vec<PathBuf> = entries
        .iter()
        .filter(|p| has_extension(p, "pdf"))
        .cloned()
        .collect();
    let pdf_stems: Vec<_> = pdfs.iter().filter_map(|p| p.file_stem()).collect();

    let txts: Vec<PathBuf> = entries
        .iter()
        .filter(|p| has_extension(p, "txt"))
        .filter(|p| p.file_stem().is_none_or(|stem| !pdf_stems.contains(&stem)))
        .cloned()
        .collect();

    debug!(
        "Found {} PDF(s) and {} text file(s) in {}",
        pdfs.len(),
        txts.len(),
        input.display()
    );

    Ok(pdfs.into_iter().chain(txts).collect())
}

/// Load one document.
///
/// A PDF that cannot be parsed becomes an empty document so that it still
/// produces an output row.
pub fn load_document(path: &Path, engine: PdfEngine) -> Result<Document> {
    let id = pdf::file_name(path);

    match pdf::document_to_text(path, engine) {
        Ok((text, stats)) => Ok(Document { id, text, stats }),
        Err(AgvError::Pdf(e)) => {
            warn!("Could not read {}: {} (continuing with empty text)", id, e);
            Ok(Document {
                id,
                text: String::new(),
                stats: TextStats::default(),
            })
        }
        Err(e) => Err(e),
    }
}
