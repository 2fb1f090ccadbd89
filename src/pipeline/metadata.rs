//! Fixed-offset competition metadata extraction.
//!
//! Results sheets from the timing software place the competition header on
//! known lines of page 1 and a timekeeping/site footer on known trailing
//! lines of every page. There is no searching and no content validation —
//! this is a positional contract on the PDF layout. The whole contract lives
//! in [`HeaderSchema`], so when the layout drifts the fix is one value, not a
//! scattering of magic indices.

use crate::error::Pdf2RaceError;
use crate::output::CompetitionMetadata;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// Line-offset layout of a results sheet.
///
/// Page-1 offsets index from the top of the page; the footer offsets count
/// back from the end (`timekeeping = len - footer_lines`,
/// `site = len - footer_lines + 1`). Body lines for the record extractor are
/// everything between the header block and the footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSchema {
    pub title_line: usize,
    pub sponsor_line: usize,
    pub date_line: usize,
    pub kind_line: usize,
    pub header_data_line: usize,
    /// First body line on page 1.
    pub first_page_body_start: usize,
    /// First body line on pages 2+.
    pub later_page_body_start: usize,
    /// Trailing lines reserved on every page (timekeeping, site, page stamp).
    pub footer_lines: usize,
}

impl Default for HeaderSchema {
    fn default() -> Self {
        Self {
            title_line: 0,
            sponsor_line: 1,
            date_line: 2,
            kind_line: 3,
            header_data_line: 5,
            first_page_body_start: 6,
            later_page_body_start: 2,
            footer_lines: 3,
        }
    }
}

impl HeaderSchema {
    /// Minimum line count a page must have for its fixed offsets to exist.
    pub fn required_lines(&self, page_num: usize) -> usize {
        if page_num == 1 {
            (self.header_data_line + 1).max(self.footer_lines)
        } else {
            self.footer_lines
        }
    }

    /// The body-line window handed to the record extractor.
    ///
    /// Saturating: a page whose footer starts before the body would start can
    /// still be metadata-complete, so the window is simply empty.
    pub fn body_window(&self, page_num: usize, line_count: usize) -> Range<usize> {
        let start = if page_num == 1 {
            self.first_page_body_start
        } else {
            self.later_page_body_start
        };
        let end = line_count.saturating_sub(self.footer_lines);
        start.min(end)..end
    }

    /// Read this page's metadata lines into `meta`.
    ///
    /// Page 1 fills the header fields; every page overwrites the
    /// timekeeping/site footer fields, so the final values come from the last
    /// page scanned. A page shorter than its fixed offsets is a structural
    /// failure of the whole conversion.
    pub fn scan_page(
        &self,
        meta: &mut CompetitionMetadata,
        page_num: usize,
        lines: &[String],
        path: &Path,
    ) -> Result<(), Pdf2RaceError> {
        let required = self.required_lines(page_num);
        if lines.len() < required {
            return Err(Pdf2RaceError::PageTooShort {
                page: page_num,
                lines: lines.len(),
                required,
                path: path.to_path_buf(),
            });
        }

        if page_num == 1 {
            meta.title = lines[self.title_line].clone();
            meta.sponsor = lines[self.sponsor_line].clone();
            meta.date = lines[self.date_line].clone();
            meta.kind = lines[self.kind_line].clone();
            meta.header_data = lines[self.header_data_line].clone();
        }

        meta.timekeeping_info = lines[lines.len() - self.footer_lines].clone();
        meta.site = lines[lines.len() - self.footer_lines + 1].clone();

        Ok(())
    }
}
