//! Output types: participant records, competition metadata, and run statistics.
//!
//! Every field of [`ParticipantRecord`] is a `String` — including the birth
//! year and finish time. The source data is a heuristically parsed text dump
//! of a PDF page, so any field can legitimately be empty or carry the literal
//! `"null"` the timing software prints for an unknown year. Keeping the raw
//! strings preserves the fixed seven-column arity of the CSV output; typed
//! interpretation (time ordering) happens in [`crate::pipeline::sort`].

use serde::{Deserialize, Serialize};

/// One participant, assembled from one or more consecutive lines of a page.
///
/// Immutable once emitted by the record extractor. The finishing position is
/// *not* stored here: it is assigned at CSV-emission time as
/// `1 + index_in_sorted_sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Start/bib number, first token of the line. Kept as text: some events
    /// issue alphanumeric bibs ("F12").
    pub bib_number: String,
    /// Athlete name, possibly joined from a wrapped continuation line.
    pub athlete_name: String,
    /// Four-digit birth year, `"null"` when the sheet prints it that way or
    /// when no year column was found, `""` never (the fallback is `"null"`).
    pub birth_year: String,
    /// `"M"`, `"F"`, or `""` when no sex marker follows the year.
    pub sex: String,
    /// Team/club, possibly empty.
    pub team: String,
    /// Nationality code, second-to-last token.
    pub nationality: String,
    /// Finish time as printed, normally `HH:MM:SS`; may be `"DNF"` etc.
    pub finish_time: String,
}

/// Competition header/footer metadata, read from fixed line offsets.
///
/// `title` through `header_data` come only from page 1. `timekeeping_info`
/// and `site` are re-read on every page, so after a multi-page document the
/// values reflect the last page processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionMetadata {
    pub title: String,
    pub sponsor: String,
    pub date: String,
    /// Competition type line ("10km road race", …). Named `kind` because
    /// `type` is reserved.
    pub kind: String,
    pub header_data: String,
    pub timekeeping_info: String,
    pub site: String,
}

/// Statistics about a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Total pages in the document.
    pub total_pages: usize,
    /// Participant records emitted (after sorting; one CSV row each).
    pub record_count: usize,
    /// Body lines discarded for having fewer than 5 tokens and not being
    /// absorbed as a name continuation.
    pub skipped_lines: usize,
    /// Wrapped-name continuation lines absorbed into the preceding record.
    pub continuation_lines: usize,
    /// Records whose finish time failed to parse (sorted to the end).
    pub invalid_times: usize,
    /// Wall-clock duration of the whole conversion.
    pub total_duration_ms: u64,
    /// Time spent inside pdfium text extraction.
    pub extract_duration_ms: u64,
}

/// The complete result of converting one race-results document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Records in final standings order (fastest first, invalid times last).
    pub records: Vec<ParticipantRecord>,
    /// Competition metadata skimmed from the header/footer offsets.
    pub metadata: CompetitionMetadata,
    /// Run statistics.
    pub stats: ConversionStats,
}

/// Lightweight document summary returned by [`crate::convert::inspect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub page_count: usize,
    pub metadata: CompetitionMetadata,
}

impl ParticipantRecord {
    /// The seven record fields in declared (CSV) order.
    pub fn fields(&self) -> [&str; 7] {
        [
            &self.bib_number,
            &self.athlete_name,
            &self.birth_year,
            &self.sex,
            &self.team,
            &self.nationality,
            &self.finish_time,
        ]
    }
}
