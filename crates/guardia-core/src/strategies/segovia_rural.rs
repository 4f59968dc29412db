//! Segovia rural roster: six parallel zone columns (Carbonero, Cantalejo,
//! Riaza, Sepúlveda, Villacastín, Navas) sharing one date column, recovered
//! with the geometric column scanner. Every zone cell on a dated row is one
//! full-day duty entry for that zone's location; Cantalejo deliberately
//! yields both of its pharmacies (see the directory).

use crate::assembler::RawAssignment;
use crate::directory;
use crate::error::GuardiaError;
use crate::extraction::columns::{self, ColumnBand};
use crate::extraction::PageContent;
use crate::locale::{self, DATE_TOKEN};
use crate::model::{DutyDate, DutyLocation, DutyRegion, DutyTimeSpan};
use crate::strategies::{ParsingStrategy, StrategyOutput};
use crate::year::resolve_year;
use chrono::NaiveDate;
use tracing::debug;

/// Zone column order as printed, left to right.
const ZONES: [DutyLocation; 6] = [
    DutyLocation::Carbonero,
    DutyLocation::Cantalejo,
    DutyLocation::Riaza,
    DutyLocation::Sepulveda,
    DutyLocation::Villacastin,
    DutyLocation::Navas,
];

/// Relative band geometry: date column on the left edge, zones splitting
/// the rest of the printable width evenly.
const DATE_BAND_X: f32 = 0.04;
const DATE_BAND_WIDTH: f32 = 0.10;
const ZONES_START_X: f32 = 0.16;
const ZONES_END_X: f32 = 0.98;

const ROW_HEIGHT: f32 = 20.0;
const SCAN_STEP: f32 = 10.0;

pub struct SegoviaRuralStrategy;

impl ParsingStrategy for SegoviaRuralStrategy {
    fn region(&self) -> DutyRegion {
        DutyRegion::SegoviaRural
    }

    fn parse(
        &self,
        pages: &[PageContent],
        source_url: Option<&str>,
        today: NaiveDate,
    ) -> Result<StrategyOutput, GuardiaError> {
        let mut out = StrategyOutput::default();

        let first_text = pages.first().map(|p| p.text.as_str()).unwrap_or("");
        let resolution = resolve_year(first_text, source_url, today);
        out.push_year(&resolution);

        let mut year = resolution.year;
        let mut last_month: Option<u32> = None;

        for page in pages {
            let date_band = ColumnBand::new(page.width * DATE_BAND_X, page.width * DATE_BAND_WIDTH);
            let zone_bands = zone_bands(page);

            for row in columns::scan_column(page, date_band, ROW_HEIGHT, SCAN_STEP) {
                let Some((day, month)) = parse_date_cell(&row.text) else {
                    // Header and footer rows land here; the sweep also
                    // re-reads dated rows through overlapping windows, and
                    // the assembler drops those duplicates.
                    continue;
                };

                if day == 1 && month == 1 && last_month == Some(12) {
                    year += 1;
                }
                if NaiveDate::from_ymd_opt(year, month, day).is_none() {
                    out.skipped_lines += 1;
                    debug!(day, month, "impossible date in rural date column, skipping row");
                    continue;
                }
                last_month = Some(month);
                let date = DutyDate::new(day, month, year);

                for (zone, band) in ZONES.iter().zip(zone_bands.iter()) {
                    let cell = columns::text_in_rect(page, *band, row.y, ROW_HEIGHT);
                    let cell = locale::normalize_whitespace(&cell);
                    if cell.is_empty() {
                        out.skipped_lines += 1;
                        debug!(zone = %zone, date = %date, "empty zone cell, skipping");
                        continue;
                    }
                    out.assignments.push(RawAssignment {
                        location: *zone,
                        date,
                        span: DutyTimeSpan::FullDay,
                        pharmacies: directory::zone_pharmacies(*zone, &cell),
                    });
                }
            }
        }

        Ok(out)
    }
}

fn zone_bands(page: &PageContent) -> [ColumnBand; 6] {
    let start = page.width * ZONES_START_X;
    let width = page.width * (ZONES_END_X - ZONES_START_X) / ZONES.len() as f32;
    std::array::from_fn(|i| ColumnBand::new(start + i as f32 * width, width))
}

/// The date column prints `dd-mmm` tokens.
fn parse_date_cell(text: &str) -> Option<(u32, u32)> {
    let normalized = locale::normalize_whitespace(text);
    let caps = DATE_TOKEN.captures(&normalized)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = locale::month_from_abbrev(&caps[2])?;
    Some((day, month))
}
