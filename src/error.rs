//! Error types for the pdf2race library.
//!
//! One enum, two kinds of failure:
//!
//! * **Fatal** — the conversion cannot proceed at all (bad input file, wrong
//!   password, a page shorter than the fixed header/footer layout). Returned
//!   as `Err(Pdf2RaceError)` from the top-level `convert*` functions. There is
//!   no partial-success mode: a structurally broken page fails the whole
//!   document rather than producing silently truncated standings.
//!
//! * **Heuristic misses** are *not* errors. A body line with too few tokens,
//!   a missing birth-year column, or an unparsable finish time all have
//!   documented local fallbacks in the pipeline and never surface here; they
//!   are counted in [`crate::output::ConversionStats`] instead.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2race library.
#[derive(Debug, Error)]
pub enum Pdf2RaceError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Text extraction failed for a specific page.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: usize, detail: String },

    // ── Structural errors ─────────────────────────────────────────────────
    /// A page has fewer text lines than the fixed header/footer layout needs.
    ///
    /// The results-sheet layout reserves line offsets for the competition
    /// header (page 1) and the timekeeping/site footer (every page). A page
    /// without them is not a results sheet this tool understands.
    #[error(
        "Page {page} has only {lines} text lines but the results-sheet layout \
         requires at least {required}.\nIs '{path}' really a race-results PDF?"
    )]
    PageTooShort {
        page: usize,
        lines: usize,
        required: usize,
        path: PathBuf,
    },

    /// The document produced no text on any page.
    #[error("No text could be extracted from '{path}' ({pages} pages).\nScanned/image-only PDFs are not supported (no OCR).")]
    NoText { path: PathBuf, pages: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file (CSV or report PDF).
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report renderer could not read the CSV it was given.
    #[error("Failed to read CSV '{path}': {detail}")]
    CsvReadFailed { path: PathBuf, detail: String },

    /// lopdf failed to assemble or save the report document.
    #[error("Failed to render report PDF '{path}': {detail}")]
    ReportRenderFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If the auto-download failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_too_short_display() {
        let e = Pdf2RaceError::PageTooShort {
            page: 1,
            lines: 2,
            required: 6,
            path: PathBuf::from("results.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("Page 1"), "got: {msg}");
        assert!(msg.contains("2 text lines"), "got: {msg}");
        assert!(msg.contains("at least 6"), "got: {msg}");
    }

    #[test]
    fn not_a_pdf_display() {
        let e = Pdf2RaceError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"Lore",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn password_required_display() {
        let e = Pdf2RaceError::PasswordRequired {
            path: PathBuf::from("locked.pdf"),
        };
        assert!(e.to_string().contains("--password"));
    }

    #[test]
    fn no_text_display() {
        let e = Pdf2RaceError::NoText {
            path: PathBuf::from("scan.pdf"),
            pages: 4,
        };
        assert!(e.to_string().contains("4 pages"));
        assert!(e.to_string().contains("OCR"));
    }
}
