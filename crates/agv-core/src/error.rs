//! Error types for the agv-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the agv library.
#[derive(Error, Debug)]
pub enum AgvError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Input path could not be used.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Configuration error (unknown selector, out-of-range bound).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed configuration file.
    #[error("invalid configuration file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to input discovery.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file or folder does not exist.
    #[error("input not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file type is not one we can read.
    #[error("unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),
}

/// Result type for the agv library.
pub type Result<T> = std::result::Result<T, AgvError>;
