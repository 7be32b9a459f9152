//! Document-to-text: PDF and plain-text reading with basic stats.

mod extractor;

pub use extractor::PdfExtractor;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AgvError, InputError, PdfError};
use crate::models::config::PdfEngine;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;
}

/// Basic statistics about extracted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub pages: u32,
    pub characters: usize,
    pub words: usize,
}

impl TextStats {
    pub fn from_text(text: &str, pages: u32) -> Self {
        Self {
            pages,
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
        }
    }
}

/// Extract text from a PDF file.
pub fn read_pdf_text(path: &Path, engine: PdfEngine) -> crate::Result<(String, TextStats)> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()).into());
    }

    let data = fs::read(path)?;
    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;
    let pages = extractor.page_count();

    let text = match engine {
        PdfEngine::PdfExtract => extractor.extract_text()?,
        PdfEngine::Lopdf => extractor.extract_text_lopdf()?,
        PdfEngine::Auto => match extractor.extract_text() {
            Ok(text) => text,
            Err(e) => {
                debug!(
                    "pdf-extract failed for {}: {} (falling back to lopdf)",
                    path.display(),
                    e
                );
                extractor.extract_text_lopdf()?
            }
        },
    };

    let stats = TextStats::from_text(&text, pages);
    Ok((text, stats))
}

/// Read a plain-text file, replacing invalid UTF-8.
pub fn read_plain_text(path: &Path) -> crate::Result<(String, TextStats)> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()).into());
    }

    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let stats = TextStats::from_text(&text, 1);
    Ok((text, stats))
}

/// Whether a path has a PDF suffix.
pub fn is_pdf(path: &Path) -> bool {
    has_suffix(path, &["pdf"])
}

/// Whether a path has a plain-text suffix.
pub fn is_plain_text(path: &Path) -> bool {
    has_suffix(path, &["txt", "text"])
}

fn has_suffix(path: &Path, suffixes: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| suffixes.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read any supported document into text.
pub fn document_to_text(path: &Path, engine: PdfEngine) -> crate::Result<(String, TextStats)> {
    if is_pdf(path) {
        read_pdf_text(path, engine)
    } else if is_plain_text(path) {
        read_plain_text(path)
    } else {
        Err(InputError::Unsupported(path.to_path_buf()).into())
    }
}

/// Extract a PDF's text into a `.txt` file.
pub fn write_pdf_text(pdf: &Path, out_txt: &Path, engine: PdfEngine) -> crate::Result<TextStats> {
    let (text, stats) = read_pdf_text(pdf, engine)?;
    if let Some(parent) = out_txt.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_txt, text)?;
    Ok(stats)
}

/// Separator placed between files in a combined corpus.
pub fn corpus_separator() -> String {
    format!("\n\n{}\n\n", "=".repeat(80))
}

/// Read several PDFs into one corpus with `[FILE: name]` headers.
///
/// Files that fail to parse are logged and left out of the corpus.
pub fn build_combined_corpus(
    pdfs: &[PathBuf],
    engine: PdfEngine,
) -> crate::Result<(String, Vec<(String, TextStats)>)> {
    let mut chunks = Vec::with_capacity(pdfs.len());
    let mut stats = Vec::with_capacity(pdfs.len());

    for pdf in pdfs {
        let name = file_name(pdf);
        match read_pdf_text(pdf, engine) {
            Ok((text, file_stats)) => {
                chunks.push(format!("[FILE: {}]\n{}", name, text));
                stats.push((name, file_stats));
            }
            Err(AgvError::Pdf(e)) => warn!("Skipping {} in corpus: {}", name, e),
            Err(e) => return Err(e),
        }
    }

    Ok((chunks.join(&corpus_separator()), stats))
}

/// Final path component as a string, used as the document identifier.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};
    use pretty_assertions::assert_eq;

    /// Write a one-page PDF showing `line` in Courier.
    fn write_one_page_pdf(path: &Path, line: &str) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_text_stats() {
        let stats = TextStats::from_text("Traglast: 500 kg\nAbmaße", 2);
        assert_eq!(
            stats,
            TextStats {
                pages: 2,
                characters: 23,
                words: 4
            }
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = document_to_text(Path::new("/nonexistent/brochure.pdf"), PdfEngine::Auto);
        assert!(matches!(
            result,
            Err(AgvError::Input(InputError::NotFound(_)))
        ));
    }

    #[test]
    fn test_unsupported_suffix() {
        let result = document_to_text(Path::new("specs.docx"), PdfEngine::Auto);
        assert!(matches!(
            result,
            Err(AgvError::Input(InputError::Unsupported(_)))
        ));
    }

    #[test]
    fn test_read_plain_text_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.TXT");
        fs::write(&path, b"Payload: 500 kg\xff").unwrap();

        let (text, stats) = document_to_text(&path, PdfEngine::Auto).unwrap();
        assert!(text.starts_with("Payload: 500 kg"));
        assert_eq!(stats.pages, 1);
        assert_eq!(stats.words, 3);
    }

    #[test]
    fn test_lopdf_reads_generated_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.pdf");
        write_one_page_pdf(&path, "AGILOX ONE 1500 kg");

        let (text, stats) = document_to_text(&path, PdfEngine::Lopdf).unwrap();
        assert!(text.contains("AGILOX ONE 1500 kg"));
        assert_eq!(stats.pages, 1);
        assert!(stats.words >= 4);
    }

    #[test]
    fn test_combined_corpus_skips_broken_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("one.pdf");
        let broken = dir.path().join("broken.pdf");
        write_one_page_pdf(&good, "NFK Narrowfork");
        fs::write(&broken, b"%PDF-1.4 truncated").unwrap();

        let (corpus, stats) = build_combined_corpus(&[good, broken], PdfEngine::Lopdf).unwrap();

        assert_eq!(corpus.matches("[FILE: ").count(), 1);
        assert!(corpus.starts_with("[FILE: one.pdf]\n"));
        assert!(corpus.contains("NFK Narrowfork"));
        assert!(!corpus.contains(&corpus_separator()));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].0, "one.pdf");
    }

    #[test]
    fn test_combined_corpus_separates_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.pdf");
        let second = dir.path().join("b.pdf");
        write_one_page_pdf(&first, "AGILOX ONE");
        write_one_page_pdf(&second, "FTS Move");

        let (corpus, _) = build_combined_corpus(&[first, second], PdfEngine::Lopdf).unwrap();

        let parts: Vec<&str> = corpus.split(&corpus_separator()).collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("[FILE: a.pdf]"));
        assert!(parts[1].starts_with("[FILE: b.pdf]"));
        assert_eq!(corpus_separator().trim(), "=".repeat(80));
    }

    #[test]
    fn test_write_pdf_text_creates_txt() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("one.pdf");
        let out = dir.path().join("text").join("one.txt");
        write_one_page_pdf(&pdf, "Payload 500 kg");

        let stats = write_pdf_text(&pdf, &out, PdfEngine::Lopdf).unwrap();

        assert_eq!(stats.pages, 1);
        assert!(fs::read_to_string(&out).unwrap().contains("Payload 500 kg"));
    }

    #[test]
    fn test_broken_pdf_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"%PDF-1.4 truncated").unwrap();

        let result = read_pdf_text(&path, PdfEngine::Auto);
        assert!(matches!(result, Err(AgvError::Pdf(_))));
    }
}
