//! CLI binary for pdf2race.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, walks the input files, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2race::{
    convert, inspect, render_report, ColumnSchema, ConversionConfig, ConversionProgressCallback,
    ProgressCallback, DEFAULT_DESCRIPTION,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live per-page progress bar using
/// [indicatif]. One instance is created per input file.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_conversion_start` (called before any pages are parsed).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Parsing");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_parsed(&self, page_num: usize, total: usize, records: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{records:>4} records")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, record_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} records from {} pages",
            green("✔"),
            bold(&record_count.to_string()),
            total_pages
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one results sheet (writes output/results_sorted.csv + report PDF)
  pdf2race results.pdf

  # Convert every PDF in a directory
  pdf2race race_sheets/ -o standings/

  # CSV only, no formatted report
  pdf2race results.pdf --csv-only

  # Legacy seven-column CSV (no sex column)
  pdf2race results.pdf --schema legacy

  # Encrypted sheet
  pdf2race results.pdf --password secret

  # Page count and competition metadata only, as JSON
  pdf2race --inspect-only --json results.pdf

  # Custom report heading
  pdf2race results.pdf --description "City Marathon 2024
Official standings"

OUTPUT FILES (per input X.pdf, written to the output directory):
  X_sorted.csv               sorted standings
  X_sorted_formatted.pdf     bordered-table report (unless --csv-only)

ENVIRONMENT VARIABLES:
  PDF2RACE_OUTPUT        Output directory (same as -o)
  PDF2RACE_SCHEMA        Column schema: modern or legacy
  PDF2RACE_PASSWORD      PDF user password
  PDF2RACE_NO_PROGRESS   Disable the progress bar
  PDFIUM_LIB_PATH        Path to an existing libpdfium — skips auto-download
  PDFIUM_AUTO_CACHE_DIR  Override the default pdfium cache directory

SETUP:
  PDFium (~30 MB) is downloaded automatically on first run and cached in
  ~/.cache/pdf2race/pdfium-7690/. No manual library setup is required.
  To use an existing pdfium copy: PDFIUM_LIB_PATH=/path/to/libpdfium pdf2race ...
"#;

/// Convert race-results PDFs to sorted CSV standings.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2race",
    version,
    about = "Convert race-results PDFs to sorted CSV standings",
    long_about = "Extract participant records from timing-software results sheets, sort them by \
finish time, and write clean CSV standings — plus an optional formatted PDF report. Accepts a \
single PDF or a directory of PDFs.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file, or a directory containing PDF files.
    input: PathBuf,

    /// Directory to write CSV (and report) files into.
    #[arg(short, long, env = "PDF2RACE_OUTPUT", default_value = "output")]
    output: PathBuf,

    /// Write only the CSV, skip the formatted PDF report.
    #[arg(long, env = "PDF2RACE_CSV_ONLY")]
    csv_only: bool,

    /// CSV column schema.
    #[arg(long, env = "PDF2RACE_SCHEMA", value_enum, default_value = "modern")]
    schema: SchemaArg,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2RACE_PASSWORD")]
    password: Option<String>,

    /// Description paragraph for the report title block (embedded newlines
    /// start new lines).
    #[arg(long, env = "PDF2RACE_DESCRIPTION")]
    description: Option<String>,

    /// Output structured JSON (records, metadata, stats) instead of summary lines.
    #[arg(long, env = "PDF2RACE_JSON")]
    json: bool,

    /// Print page count and competition metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2RACE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2RACE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2RACE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SchemaArg {
    Modern,
    Legacy,
}

impl From<SchemaArg> for ColumnSchema {
    fn from(v: SchemaArg) -> Self {
        match v {
            SchemaArg::Modern => ColumnSchema::Modern,
            SchemaArg::Legacy => ColumnSchema::Legacy,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure PDFium engine is available ────────────────────────────────
    // With `--features bundled` the pdfium shared library was embedded at
    // compile time; we just extract it (if needed) and continue. Without
    // `bundled`, the first run downloads the library (~30 MB) from
    // bblanchon/pdfium-binaries to ~/.cache/pdf2race/pdfium-{VERSION}/.
    // Subsequent startups skip this block entirely (path check only).
    #[cfg(feature = "bundled")]
    {
        pdfium_auto::ensure_pdfium_bundled()
            .context("Failed to extract bundled PDFium engine")?;
    }

    #[cfg(not(feature = "bundled"))]
    if !pdfium_auto::is_pdfium_cached() {
        if !cli.quiet {
            let dl_bar = ProgressBar::new(0);
            dl_bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            dl_bar.set_prefix("PDF engine");
            dl_bar.set_message("Connecting…");
            dl_bar.enable_steady_tick(Duration::from_millis(80));

            let bar = dl_bar.clone();
            pdfium_auto::ensure_pdfium_library(Some(&move |downloaded, total| {
                if let Some(t) = total {
                    if bar.length().unwrap_or(0) != t {
                        bar.set_length(t);
                        bar.set_prefix("PDF engine");
                    }
                }
                bar.set_position(downloaded);
            }))
            .context("Failed to download PDFium engine")?;

            dl_bar.finish_with_message("ready ✓");
        } else {
            // Quiet mode — download silently; errors still propagate.
            pdfium_auto::ensure_pdfium_library(None)
                .context("Failed to download PDFium engine")?;
        }
    }

    // ── Collect input files ──────────────────────────────────────────────
    let inputs = collect_inputs(&cli.input)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        for path in &inputs {
            let summary = inspect(path, &config)
                .with_context(|| format!("Failed to inspect {}", path.display()))?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary)
                        .context("Failed to serialise summary")?
                );
            } else {
                println!("File:         {}", path.display());
                println!("Pages:        {}", summary.page_count);
                println!("Title:        {}", summary.metadata.title);
                println!("Sponsor:      {}", summary.metadata.sponsor);
                println!("Date:         {}", summary.metadata.date);
                println!("Kind:         {}", summary.metadata.kind);
                println!("Timekeeping:  {}", summary.metadata.timekeeping_info);
                println!("Site:         {}", summary.metadata.site);
            }
        }
        return Ok(());
    }

    // ── Run conversions ──────────────────────────────────────────────────
    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create output directory {}", cli.output.display()))?;

    let description = cli
        .description
        .clone()
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    for path in &inputs {
        if !cli.quiet && inputs.len() > 1 {
            eprintln!("{} {}", cyan("◆"), bold(&path.display().to_string()));
        }

        let progress_cb: Option<ProgressCallback> = if show_progress {
            let cb = CliProgressCallback::new_dynamic();
            Some(cb as Arc<dyn ConversionProgressCallback>)
        } else {
            None
        };
        let config = build_config(&cli, progress_cb)?;

        let output = convert(path, &config)
            .with_context(|| format!("Conversion failed for {}", path.display()))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("results");
        let csv_path = cli.output.join(format!("{stem}_sorted.csv"));
        pdf2race::pipeline::csv_out::write_csv_file(&csv_path, &output.records, config.schema)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;

        let report_path = if cli.csv_only {
            None
        } else {
            let p = cli.output.join(format!("{stem}_sorted_formatted.pdf"));
            render_report(&csv_path, &p, &description)
                .with_context(|| format!("Failed to render {}", p.display()))?;
            Some(p)
        };

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?
            );
        } else if !cli.quiet {
            eprintln!(
                "{}  {} records  {}ms  →  {}",
                if output.stats.invalid_times == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                output.stats.record_count,
                output.stats.total_duration_ms,
                bold(&csv_path.display().to_string()),
            );
            if let Some(ref p) = report_path {
                eprintln!("   report: {}", dim(&p.display().to_string()));
            }
            if output.stats.invalid_times > 0 {
                eprintln!(
                    "   {} entries with unparseable times placed last",
                    red(&output.stats.invalid_times.to_string())
                );
            }
            if output.stats.skipped_lines > 0 {
                eprintln!(
                    "   {}",
                    dim(&format!(
                        "{} body lines skipped as non-records",
                        output.stats.skipped_lines
                    ))
                );
            }
        }
    }

    Ok(())
}

/// Expand a file-or-directory input into a sorted list of PDF paths.
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_dir() {
        let mut pdfs: Vec<PathBuf> = std::fs::read_dir(input)
            .with_context(|| format!("Failed to read directory {}", input.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
            })
            .collect();
        pdfs.sort();
        if pdfs.is_empty() {
            anyhow::bail!("No PDF files found in {}", input.display());
        }
        Ok(pdfs)
    } else {
        Ok(vec![input.to_path_buf()])
    }
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder().schema(cli.schema.into());

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref desc) = cli.description {
        builder = builder.report_description(desc.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
