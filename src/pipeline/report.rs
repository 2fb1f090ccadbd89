//! Formatted report: render the standings CSV as a bordered PDF table.
//!
//! Pure layout code, deliberately dumb: a centred bold title, an optional
//! centred description paragraph, then one bordered row per CSV record.
//! Column widths are balanced proportionally to each column's widest rendered
//! string (capitalised header or cell), measured with Helvetica core-font
//! metrics, so narrow columns (pos, sex) stay narrow and the name column
//! takes the slack. Rows that overflow the page continue on a fresh page.
//!
//! The renderer reads the CSV back rather than taking records, so it works
//! on any standings file regardless of which column schema produced it.

use crate::error::Pdf2RaceError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::path::Path;
use tracing::info;

// A4 portrait, in points.
const PAGE_WIDTH: f64 = 595.276;
const PAGE_HEIGHT: f64 = 841.89;
const MARGIN: f64 = 30.0;

const TITLE_SIZE: f64 = 14.0;
const BODY_SIZE: f64 = 10.0;
const TABLE_SIZE: f64 = 9.0;
const ROW_HEIGHT: f64 = TABLE_SIZE * 1.5;

/// Stock description paragraph used when the caller supplies none.
pub const DEFAULT_DESCRIPTION: &str = "Race Results\n\
    This document contains the sorted race results with participant details.\n\
    Athletes are ranked by their finish time.";

/// Advance widths for Helvetica, glyphs 32..=126, in 1/1000 em
/// (Adobe core-14 AFM values).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Rendered width of `s` in points at the given font size.
fn string_width(s: &str, size: f64) -> f64 {
    let units: u32 = s
        .chars()
        .map(|c| match u32::from(c).checked_sub(32) {
            Some(i) if (i as usize) < HELVETICA_WIDTHS.len() => {
                u32::from(HELVETICA_WIDTHS[i as usize])
            }
            // Accented Latin-1 glyphs and anything exotic: average width.
            _ => 556,
        })
        .sum();
    f64::from(units) / 1000.0 * size
}

/// First letter upper-cased, the rest lower-cased ("bib number" → "Bib number").
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Cell display text: numeric values with no fractional part lose the
/// decimal point ("3.0" → "3"); everything else is shown verbatim.
fn format_cell(raw: &str) -> String {
    if let Ok(v) = raw.trim().parse::<f64>() {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
            return format!("{}", v as i64);
        }
    }
    raw.to_string()
}

/// Latin-1 bytes for a PDF literal string under WinAnsiEncoding.
fn encode_text(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if u32::from(c) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}

/// Balance column widths proportionally to the widest rendered string in
/// each column, normalised so they sum to `table_width`.
fn balance_columns(headers: &[String], rows: &[Vec<String>], table_width: f64) -> Vec<f64> {
    let mut ratios: Vec<f64> = headers
        .iter()
        .map(|h| string_width(&capitalize(h), TABLE_SIZE))
        .collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(ratios.len()) {
            let w = string_width(&format_cell(cell), TABLE_SIZE);
            if w > ratios[i] {
                ratios[i] = w;
            }
        }
    }
    let total: f64 = ratios.iter().sum();
    if total <= 0.0 {
        let even = table_width / ratios.len().max(1) as f64;
        return vec![even; ratios.len()];
    }
    ratios.iter().map(|r| table_width * (r / total)).collect()
}

/// One page's content stream under construction.
struct PageOps {
    ops: Vec<Operation>,
    y: f64,
}

impl PageOps {
    fn new() -> Self {
        Self {
            ops: vec![Operation::new("w", vec![0.5.into()])],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn centered_text(&mut self, font: &str, size: f64, x_center: f64, y: f64, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Tf", vec![font.into(), size.into()]));
        let x = x_center - string_width(text, size) / 2.0;
        self.ops
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_text(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// One bordered table row. `y` is consumed by `ROW_HEIGHT`.
    fn table_row(&mut self, cells: &[String], widths: &[f64]) {
        let top = self.y;
        let bottom = top - ROW_HEIGHT;
        let mut x = MARGIN;
        for (cell, &w) in cells.iter().zip(widths) {
            self.ops.push(Operation::new(
                "re",
                vec![x.into(), bottom.into(), w.into(), ROW_HEIGHT.into()],
            ));
            self.ops.push(Operation::new("S", vec![]));
            let text = format_cell(cell);
            let baseline = bottom + (ROW_HEIGHT - TABLE_SIZE) / 2.0 + 1.0;
            self.centered_text("F1", TABLE_SIZE, x + w / 2.0, baseline, &text);
            x += w;
        }
        self.y = bottom;
    }

    fn fits_row(&self) -> bool {
        self.y - ROW_HEIGHT >= MARGIN
    }
}

/// Render `csv_path` as a bordered-table PDF at `pdf_path`.
///
/// `description` is placed under the title as a centred paragraph; embedded
/// newlines start new lines.
pub fn render_report(
    csv_path: &Path,
    pdf_path: &Path,
    description: &str,
) -> Result<(), Pdf2RaceError> {
    // ── Read the CSV back ────────────────────────────────────────────────
    let mut reader = csv::ReaderBuilder::new()
        .from_path(csv_path)
        .map_err(|e| Pdf2RaceError::CsvReadFailed {
            path: csv_path.to_path_buf(),
            detail: e.to_string(),
        })?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Pdf2RaceError::CsvReadFailed {
            path: csv_path.to_path_buf(),
            detail: e.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| {
            r.map(|rec| rec.iter().map(str::to_string).collect())
                .map_err(|e| Pdf2RaceError::CsvReadFailed {
                    path: csv_path.to_path_buf(),
                    detail: e.to_string(),
                })
        })
        .collect::<Result<_, _>>()?;

    let table_width = PAGE_WIDTH - 2.0 * MARGIN;
    let widths = balance_columns(&headers, &rows, table_width);
    let header_cells: Vec<String> = headers.iter().map(|h| capitalize(h)).collect();

    // ── Lay out pages ────────────────────────────────────────────────────
    let mut pages: Vec<PageOps> = Vec::new();
    let mut page = PageOps::new();

    page.y -= TITLE_SIZE;
    page.centered_text("F2", TITLE_SIZE, PAGE_WIDTH / 2.0, page.y, "Race Results");
    page.y -= 8.0;

    let line_height = BODY_SIZE * 1.2;
    for line in description.lines() {
        page.y -= line_height;
        page.centered_text("F1", BODY_SIZE, PAGE_WIDTH / 2.0, page.y, line);
    }
    page.y -= 8.0;

    page.table_row(&header_cells, &widths);
    for row in &rows {
        if !page.fits_row() {
            pages.push(std::mem::replace(&mut page, PageOps::new()));
        }
        page.table_row(row, &widths);
    }
    pages.push(page);

    // ── Assemble the document ────────────────────────────────────────────
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_regular, "F2" => font_bold },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page.ops,
        };
        let encoded = content
            .encode()
            .map_err(|e| Pdf2RaceError::ReportRenderFailed {
                path: pdf_path.to_path_buf(),
                detail: e.to_string(),
            })?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    doc.save(pdf_path)
        .map_err(|e| Pdf2RaceError::ReportRenderFailed {
            path: pdf_path.to_path_buf(),
            detail: e.to_string(),
        })?;

    info!(
        "Wrote report: {} ({} rows, {} pages)",
        pdf_path.display(),
        rows.len(),
        page_count
    );
    Ok(())
}
