//! PDF text extraction: per-page line lists via pdfium.
//!
//! This is the capability boundary the rest of the pipeline is insulated
//! from: any backend that yields each page's text as a sequence of lines
//! would do. pdfium is used because it is fast, handles real-world timing
//! sheets well, and ships as a single auto-downloaded library (see the
//! `pdfium-auto` crate). No layout analysis happens here — the heuristics
//! all live downstream in the tokenizer and record extractor.

use crate::error::Pdf2RaceError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Bind to pdfium, preferring the copy cached by `pdfium-auto`.
fn bind_pdfium() -> Result<Pdfium, Pdf2RaceError> {
    match pdfium_auto::cached_pdfium_path() {
        Some(lib) => pdfium_auto::bind_pdfium_from_path(&lib)
            .map_err(|e| Pdf2RaceError::PdfiumBindingFailed(e.to_string())),
        // No cached copy: fall back to pdfium-render's default search
        // (PDFIUM_DYNAMIC_LIB_PATH, current directory, system library).
        None => Ok(Pdfium::default()),
    }
}

fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2RaceError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2RaceError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                Pdf2RaceError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            Pdf2RaceError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Extract every page's text as a list of lines, in document order.
///
/// Pages without any extractable text yield an empty list; deciding what an
/// empty page means (skip vs. fail) is the caller's business.
pub fn extract_page_lines(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<Vec<String>>, Pdf2RaceError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut result = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let text = page.text().map_err(|e| Pdf2RaceError::ExtractionFailed {
            page: idx + 1,
            detail: format!("{:?}", e),
        })?;
        let lines: Vec<String> = text.all().lines().map(str::to_string).collect();
        debug!("Page {}: {} text lines", idx + 1, lines.len());
        result.push(lines);
    }

    Ok(result)
}
