//! # pdf2race
//!
//! Convert race-results PDFs into sorted CSV standings.
//!
//! ## Why this crate?
//!
//! Timing-software result sheets are laid out for print, not for data work:
//! columns merge, long names wrap mid-record, and the finish order on the
//! page is the order athletes were keyed in, not the order they finished.
//! This crate extracts the text layer via pdfium, reconstructs one record per
//! participant with a token-count heuristic, sorts globally by finish time,
//! and writes a clean CSV — optionally rendered back into a formatted PDF
//! table for hand-outs.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file, check magic
//!  ├─ 2. Extract   per-page text lines via pdfium
//!  ├─ 3. Metadata  fixed-offset header/footer scan (HeaderSchema)
//!  ├─ 4. Records   tokenize + two-state extractor (wrapped names absorbed)
//!  ├─ 5. Sort      stable, by parsed H:MM:SS; unparseable times sink last
//!  ├─ 6. CSV       atomic write, Modern or Legacy column schema
//!  └─ 7. Report    optional bordered-table PDF from the CSV (lopdf)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2race::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("results.pdf", &config)?;
//!     for (pos, rec) in output.records.iter().enumerate() {
//!         println!("{} {} {}", pos + 1, rec.athlete_name, rec.finish_time);
//!     }
//!     eprintln!(
//!         "{} records from {} pages ({} lines skipped)",
//!         output.stats.record_count,
//!         output.stats.total_pages,
//!         output.stats.skipped_lines
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `cli`     | on      | Enables the `pdf2race` binary (clap + anyhow + indicatif + tracing-subscriber) |
//! | `bundled` | off     | Embeds the pdfium library named by `PDFIUM_BUNDLE_LIB` at build time |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2race = { version = "0.3", default-features = false }
//! ```
//!
//! ## Error Philosophy
//!
//! Fatal errors (missing file, corrupt PDF, a page that does not match the
//! results-sheet layout) come back as [`Pdf2RaceError`]. Per-line heuristic
//! misses never fail a conversion; they are counted in [`ConversionStats`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ColumnSchema, ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_bytes, convert_to_file, inspect, parse_document};
pub use error::Pdf2RaceError;
pub use output::{
    CompetitionMetadata, ConversionOutput, ConversionStats, DocumentSummary, ParticipantRecord,
};
pub use pipeline::metadata::HeaderSchema;
pub use pipeline::report::{render_report, DEFAULT_DESCRIPTION};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
