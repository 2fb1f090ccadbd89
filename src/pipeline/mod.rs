//! Pipeline stages for PDF-to-CSV conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the text-extraction backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ metadata ──▶ tokenize ──▶ record ──▶ sort ──▶ csv_out ──▶ report
//! (path)    (pdfium)    (offsets)    (fix-up)     (state     (time     (csv)      (lopdf)
//!                                                  machine)   order)
//! ```
//!
//! 1. [`input`]    — validate the user-supplied path and PDF magic bytes
//! 2. [`extract`]  — pdfium text extraction, one line list per page
//! 3. [`metadata`] — fixed-offset header/footer skim behind [`metadata::HeaderSchema`]
//! 4. [`tokenize`] — whitespace split + merged name/year token recovery
//! 5. [`record`]   — per-line field assignment and wrapped-name absorption
//! 6. [`sort`]     — stable standings order by parsed finish time
//! 7. [`csv_out`]  — header + 1-indexed rows, written atomically
//! 8. [`report`]   — optional bordered-table PDF rendering of the CSV

pub mod csv_out;
pub mod extract;
pub mod input;
pub mod metadata;
pub mod record;
pub mod report;
pub mod sort;
pub mod tokenize;
