//! Top-level conversion entry points.
//!
//! [`convert`] runs the whole pipeline on one document; [`convert_to_file`]
//! additionally writes the standings CSV; [`parse_document`] is the
//! extraction-free core, taking per-page line lists directly so the heuristic
//! parsing is testable (and reusable) without pdfium or a PDF file.
//!
//! All per-document mutable state — the metadata being filled in, the record
//! accumulator, the extractor carrying a possibly-pending record across page
//! boundaries — is owned by one [`DocumentParse`] value threaded through the
//! page loop, so a conversion holds no state outside its own call.

use crate::config::ConversionConfig;
use crate::error::Pdf2RaceError;
use crate::output::{
    CompetitionMetadata, ConversionOutput, ConversionStats, DocumentSummary, ParticipantRecord,
};
use crate::pipeline::record::RecordExtractor;
use crate::pipeline::sort::sort_standings;
use crate::pipeline::{csv_out, extract, input};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Per-document accumulation state.
struct DocumentParse {
    metadata: CompetitionMetadata,
    records: Vec<ParticipantRecord>,
    extractor: RecordExtractor,
}

impl DocumentParse {
    fn new() -> Self {
        Self {
            metadata: CompetitionMetadata::default(),
            records: Vec::new(),
            extractor: RecordExtractor::new(),
        }
    }

    /// Skim this page's metadata offsets, then feed its body lines to the
    /// record extractor.
    fn ingest_page(
        &mut self,
        config: &ConversionConfig,
        page_num: usize,
        lines: &[String],
        source: &Path,
    ) -> Result<(), Pdf2RaceError> {
        config
            .header
            .scan_page(&mut self.metadata, page_num, lines, source)?;
        for line in &lines[config.header.body_window(page_num, lines.len())] {
            if let Some(rec) = self.extractor.push_line(line) {
                self.records.push(rec);
            }
        }
        Ok(())
    }

    /// Flush the extractor, sort the standings, and assemble the output.
    fn into_output(mut self, total_pages: usize) -> ConversionOutput {
        self.records.extend(self.extractor.finish());
        let invalid_times = sort_standings(&mut self.records);
        let stats = ConversionStats {
            total_pages,
            record_count: self.records.len(),
            skipped_lines: self.extractor.skipped_lines,
            continuation_lines: self.extractor.continuation_lines,
            invalid_times,
            ..ConversionStats::default()
        };
        ConversionOutput {
            records: self.records,
            metadata: self.metadata,
            stats,
        }
    }
}

/// Convert a race-results PDF into sorted standings.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns `Err(Pdf2RaceError)` for fatal errors only:
/// - File not found / permission denied / not a PDF
/// - Corrupt or password-protected PDF
/// - A page structurally incompatible with the results-sheet layout
///
/// Per-line heuristic misses are never errors; they are counted in
/// [`ConversionStats`].
pub fn convert(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2RaceError> {
    let total_start = Instant::now();
    let pdf_path = input::resolve_local(input_path.as_ref())?;
    info!("Starting conversion: {}", pdf_path.display());

    let extract_start = Instant::now();
    let pages = extract::extract_page_lines(&pdf_path, config.password.as_deref())?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    let mut output = parse_document(&pdf_path, &pages, config)?;
    output.stats.extract_duration_ms = extract_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Conversion complete: {} records from {} pages in {}ms",
        output.stats.record_count, output.stats.total_pages, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Parse already-extracted page lines into sorted standings.
///
/// `source` is used only for error context. Pages with no extractable text
/// are skipped; a document where *every* page is empty fails with
/// [`Pdf2RaceError::NoText`] because there is nothing to produce standings
/// from (scanned/image-only PDFs land here — no OCR).
pub fn parse_document(
    source: &Path,
    pages: &[Vec<String>],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2RaceError> {
    if pages.iter().all(|p| p.is_empty()) {
        return Err(Pdf2RaceError::NoText {
            path: source.to_path_buf(),
            pages: pages.len(),
        });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(pages.len());
    }

    let mut parse = DocumentParse::new();
    for (idx, lines) in pages.iter().enumerate() {
        let page_num = idx + 1;
        if lines.is_empty() {
            debug!("Page {} has no text, skipping", page_num);
            continue;
        }
        let before = parse.records.len();
        parse.ingest_page(config, page_num, lines, source)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_parsed(page_num, pages.len(), parse.records.len() - before);
        }
    }

    let output = parse.into_output(pages.len());
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(pages.len(), output.stats.record_count);
    }
    Ok(output)
}

/// Convert a PDF provided as in-memory bytes.
///
/// Internally the library writes `bytes` to a managed [`tempfile`] and
/// converts that; the temp file is deleted on return.
pub fn convert_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2RaceError> {
    use std::io::Write;

    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| Pdf2RaceError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Pdf2RaceError::Internal(format!("tempfile write: {e}")))?;
    tmp.flush()
        .map_err(|e| Pdf2RaceError::Internal(format!("tempfile flush: {e}")))?;

    convert(tmp.path(), config)
}

/// Convert a PDF and write the sorted standings CSV to `csv_path`.
///
/// The CSV is written atomically (temp file + rename) to prevent partial
/// files. Returns the run statistics.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    csv_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2RaceError> {
    let output = convert(input_path, config)?;
    csv_out::write_csv_file(csv_path.as_ref(), &output.records, config.schema)?;
    Ok(output.stats)
}

/// Extract page count and competition metadata without parsing records.
pub fn inspect(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<DocumentSummary, Pdf2RaceError> {
    let pdf_path = input::resolve_local(input_path.as_ref())?;
    let pages = extract::extract_page_lines(&pdf_path, config.password.as_deref())?;

    let mut metadata = CompetitionMetadata::default();
    for (idx, lines) in pages.iter().enumerate() {
        if lines.is_empty() {
            continue;
        }
        config
            .header
            .scan_page(&mut metadata, idx + 1, lines, &pdf_path)?;
    }

    Ok(DocumentSummary {
        page_count: pages.len(),
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ConversionProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn page(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn first_page() -> Vec<String> {
        page(&[
            "City Marathon 2024",
            "Sponsored by Acme",
            "2024-05-12",
            "Road race 10 km",
            "",
            "pos pett athlete year sex team nat time",
            "101 Smith 1990 M TeamX USA 00:45:12",
            "103 Slow 1970 M TeamZ CAN 01:20:00",
            "Timing by ChronoCo",
            "Springfield",
            "Page 1/2",
        ])
    }

    fn second_page() -> Vec<String> {
        page(&[
            "continued",
            "",
            "102 Jones null GBR 00:44:00",
            "104 Broken 1999 F TeamQ IRL DNF",
            "Timing by ChronoCo (final)",
            "Shelbyville",
            "Page 2/2",
        ])
    }

    #[test]
    fn two_page_document_pools_and_sorts_globally() {
        let config = ConversionConfig::default();
        let out =
            parse_document(Path::new("r.pdf"), &[first_page(), second_page()], &config).unwrap();

        let bibs: Vec<_> = out.records.iter().map(|r| r.bib_number.as_str()).collect();
        // Page-2 runner 102 is fastest; DNF sinks to the end.
        assert_eq!(bibs, ["102", "101", "103", "104"]);
        assert_eq!(out.stats.total_pages, 2);
        assert_eq!(out.stats.record_count, 4);
        assert_eq!(out.stats.invalid_times, 1);
        assert_eq!(out.metadata.title, "City Marathon 2024");
        assert_eq!(out.metadata.timekeeping_info, "Timing by ChronoCo (final)");
        assert_eq!(out.metadata.site, "Shelbyville");
    }

    #[test]
    fn empty_pages_are_skipped_not_fatal() {
        let config = ConversionConfig::default();
        let out = parse_document(
            Path::new("r.pdf"),
            &[first_page(), Vec::new(), second_page()],
            &config,
        )
        .unwrap();
        assert_eq!(out.stats.total_pages, 3);
        assert_eq!(out.stats.record_count, 4);
    }

    #[test]
    fn all_empty_pages_is_no_text() {
        let config = ConversionConfig::default();
        let err =
            parse_document(Path::new("scan.pdf"), &[Vec::new(), Vec::new()], &config).unwrap_err();
        assert!(matches!(err, Pdf2RaceError::NoText { pages: 2, .. }));
    }

    #[test]
    fn short_page_fails_whole_conversion() {
        let config = ConversionConfig::default();
        let err = parse_document(
            Path::new("r.pdf"),
            &[first_page(), page(&["too", "short"])],
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, Pdf2RaceError::PageTooShort { page: 2, .. }));
    }

    #[test]
    fn name_wrap_across_page_boundary_joins_one_record() {
        // Last body line of page 1 starts a record; the first body line of
        // page 2 is a short fragment and must attach to it.
        let mut p1 = first_page();
        p1.insert(8, "55 Vandenberghe 1979 M Cycling Team BEL 02:10:44".into());
        let mut p2 = second_page();
        p2.insert(2, "Jean-Pierre".into());

        let config = ConversionConfig::default();
        let out = parse_document(Path::new("r.pdf"), &[p1, p2], &config).unwrap();

        let wrapped = out
            .records
            .iter()
            .find(|r| r.bib_number == "55")
            .expect("record 55 present");
        assert_eq!(wrapped.athlete_name, "Vandenberghe Jean-Pierre");
        assert_eq!(out.stats.continuation_lines, 1);
        assert_eq!(out.stats.record_count, 5);
    }

    #[test]
    fn progress_callback_sees_every_page() {
        struct Counter {
            pages: AtomicUsize,
            records: AtomicUsize,
        }
        impl ConversionProgressCallback for Counter {
            fn on_page_parsed(&self, _p: usize, _t: usize, records: usize) {
                self.pages.fetch_add(1, Ordering::SeqCst);
                self.records.fetch_add(records, Ordering::SeqCst);
            }
        }

        let counter = Arc::new(Counter {
            pages: AtomicUsize::new(0),
            records: AtomicUsize::new(0),
        });
        let config = ConversionConfig::builder()
            .progress_callback(counter.clone())
            .build()
            .unwrap();

        parse_document(Path::new("r.pdf"), &[first_page(), second_page()], &config).unwrap();
        assert_eq!(counter.pages.load(Ordering::SeqCst), 2);
        // The last record of page 2 is only flushed at finish(), so per-page
        // counts cover completed records.
        assert!(counter.records.load(Ordering::SeqCst) >= 3);
    }
}
