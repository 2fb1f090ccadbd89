//! Configuration types for PDF-to-CSV conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share one config across a batch run.

use crate::error::Pdf2RaceError;
use crate::pipeline::metadata::HeaderSchema;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a race-results conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2race::{ColumnSchema, ConversionConfig};
///
/// let config = ConversionConfig::builder()
///     .schema(ColumnSchema::Modern)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// CSV column schema. Default: [`ColumnSchema::Modern`].
    pub schema: ColumnSchema,

    /// Line-offset layout of the results sheet. Default: [`HeaderSchema::default()`].
    ///
    /// The positional header/footer contract lives entirely in this value, so
    /// a timing-software layout change is a one-place fix.
    pub header: HeaderSchema,

    /// Description paragraph for the formatted PDF report. If None, a stock
    /// description is used.
    pub report_description: Option<String>,

    /// Optional per-page progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("schema", &self.schema)
            .field("header", &self.header)
            .field("report_description", &self.report_description)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn schema(mut self, schema: ColumnSchema) -> Self {
        self.config.schema = schema;
        self
    }

    pub fn header(mut self, header: HeaderSchema) -> Self {
        self.config.header = header;
        self
    }

    pub fn report_description(mut self, desc: impl Into<String>) -> Self {
        self.config.report_description = Some(desc.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2RaceError> {
        let h = &self.config.header;
        if h.first_page_body_start <= h.header_data_line {
            return Err(Pdf2RaceError::InvalidConfig(format!(
                "first_page_body_start ({}) must lie below header_data_line ({})",
                h.first_page_body_start, h.header_data_line
            )));
        }
        if h.footer_lines < 2 {
            return Err(Pdf2RaceError::InvalidConfig(format!(
                "footer_lines must be ≥ 2 (timekeeping + site), got {}",
                h.footer_lines
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which CSV column set to emit.
///
/// Two historical variants of this tool produced different column sets; they
/// are kept selectable rather than merged because downstream spreadsheets
/// key on the exact header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnSchema {
    /// Eight columns: `pos, pett, athlete, year, sex, team, nat, time`. (default)
    #[default]
    Modern,
    /// Seven columns, no sex: `position, bib number, athlete, year, team,
    /// nationality, race time`.
    Legacy,
}

impl ColumnSchema {
    /// The header row for this schema.
    pub fn header_row(&self) -> &'static [&'static str] {
        match self {
            ColumnSchema::Modern => {
                &["pos", "pett", "athlete", "year", "sex", "team", "nat", "time"]
            }
            ColumnSchema::Legacy => &[
                "position",
                "bib number",
                "athlete",
                "year",
                "team",
                "nationality",
                "race time",
            ],
        }
    }
}
