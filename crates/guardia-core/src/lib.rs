pub mod assembler;
pub mod directory;
pub mod error;
pub mod extraction;
pub mod locale;
pub mod model;
pub mod strategies;
pub mod year;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::warn;

use extraction::PdfExtractor;
use model::{DutyRegion, ScheduleMap};
use strategies::strategy_for;
use year::YearResolution;

/// Everything one parse run produced: the assembled schedules plus the
/// diagnostics callers surface or log. Persisted verbatim by downstream
/// caches, keyed on `cache_schema_version`.
#[derive(Debug, Serialize)]
pub struct ParseOutcome {
    pub cache_schema_version: u32,
    pub schedules: ScheduleMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<YearResolution>,
    pub warnings: Vec<String>,
    pub skipped_lines: usize,
}

impl Default for ParseOutcome {
    fn default() -> Self {
        ParseOutcome {
            cache_schema_version: model::CACHE_SCHEMA_VERSION,
            schedules: ScheduleMap::new(),
            year: None,
            warnings: Vec::new(),
            skipped_lines: 0,
        }
    }
}

impl ParseOutcome {
    fn document_fatal(reason: String) -> ParseOutcome {
        warn!("document-fatal parse fault: {reason}");
        ParseOutcome {
            warnings: vec![reason],
            ..ParseOutcome::default()
        }
    }

    /// Total number of assembled schedule entries across all locations.
    pub fn entry_count(&self) -> usize {
        self.schedules.values().map(Vec::len).sum()
    }
}

/// Main API entry point: parse one region's duty roster PDF into the
/// per-location schedule map.
///
/// Never panics and never returns an error past this boundary: a PDF that
/// cannot be opened at all yields an empty map with a warning attached,
/// per-page and per-line faults just produce less output. An empty map for
/// a location means "no data available", not a failure to retry.
pub fn parse_schedules(
    region: DutyRegion,
    pdf_bytes: &[u8],
    source_url: Option<&str>,
    extractor: &dyn PdfExtractor,
) -> ParseOutcome {
    parse_schedules_at(region, pdf_bytes, source_url, extractor, Local::now().date_naive())
}

/// [`parse_schedules`] with an explicit "today" anchoring year resolution;
/// split out so tests are deterministic.
pub fn parse_schedules_at(
    region: DutyRegion,
    pdf_bytes: &[u8],
    source_url: Option<&str>,
    extractor: &dyn PdfExtractor,
    today: NaiveDate,
) -> ParseOutcome {
    let pages = match extractor.extract_pages(pdf_bytes) {
        Ok(pages) => pages,
        Err(e) => return ParseOutcome::document_fatal(e.to_string()),
    };

    let strategy = strategy_for(region);
    let output = match strategy.parse(&pages, source_url, today) {
        Ok(output) => output,
        Err(e) => return ParseOutcome::document_fatal(e.to_string()),
    };

    let fallback_year = output
        .year
        .as_ref()
        .map(|y| y.year)
        .unwrap_or_else(|| today.year());
    let schedules = assembler::assemble(output.assignments, fallback_year);

    ParseOutcome {
        schedules,
        year: output.year,
        warnings: output.warnings,
        skipped_lines: output.skipped_lines,
        ..ParseOutcome::default()
    }
}

/// Parse with the bundled pdf-extract backend.
pub fn parse_schedules_from_pdf(
    region: DutyRegion,
    pdf_bytes: &[u8],
    source_url: Option<&str>,
) -> ParseOutcome {
    let backend = extraction::pdf_text::PdfTextBackend::new();
    parse_schedules(region, pdf_bytes, source_url, &backend)
}
