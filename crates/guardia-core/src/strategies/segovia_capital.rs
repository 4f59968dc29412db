//! Segovia capital roster: a genuine three-column table, date | day-shift
//! pharmacy block | night-shift pharmacy block, each pharmacy block three
//! physical lines (name, address, phone + extra info).
//!
//! Two recovery paths exist. The pure-text single pass recognizes the
//! composite name line (day and night "FARMACIA..." concatenated on one
//! physical line) and assembles addresses and phones from the following
//! lines with anchored patterns, carrying a pending record that only
//! flushes once both shift triples are complete. When the text pass yields
//! nothing (exports where reading order scrambles the columns), the
//! geometric column scanner recovers the three cell regions directly.

use crate::assembler::RawAssignment;
use crate::error::GuardiaError;
use crate::extraction::columns::{self, ColumnBand};
use crate::extraction::PageContent;
use crate::locale;
use crate::model::{
    DutyDate, DutyLocation, DutyRegion, DutyTimeSpan, Pharmacy, PHONE_NOT_AVAILABLE,
};
use crate::strategies::{ParsingStrategy, StrategyOutput};
use crate::year::resolve_year;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// A whole line that is just a Spanish date, weekday and year optional:
/// "Viernes, 7 de marzo de 2025", "7 de marzo".
static CAPITAL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:lunes|martes|mi[ée]rcoles|jueves|viernes|s[áa]bado|domingo)[,.]?\s+)?(\d{1,2})\s+de\s+([a-záéíóúñ]+)(?:\s+de\s+(\d{4}))?$",
    )
    .expect("CAPITAL_DATE regex to compile")
});

static FARMACIA_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFARMACIA\b").expect("FARMACIA_MARK regex to compile"));

static ADDRESS_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:C/|CALLE\b|AVDA\.?|AVENIDA\b|PLAZA\b|PZA\.?|PASEO\b|CTRA\.?|TRAVES[ÍI]A\b)")
        .expect("ADDRESS_ANCHOR regex to compile")
});

/// Spanish landline, 3+3+3 or 3+2+2+2 grouping.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{3}[ .]?\d{3}[ .]?\d{3}\b|\b\d{3}[ .]?\d{2}[ .]?\d{2}[ .]?\d{2}\b")
        .expect("PHONE regex to compile")
});

/// Sweep geometry for the column fallback.
const ROW_HEIGHT: f32 = 54.0;
const SCAN_STEP: f32 = 6.0;
const MARGIN_RATIO: f32 = 0.06;
const DATE_COL_RATIO: f32 = 0.24;

pub struct SegoviaCapitalStrategy;

impl ParsingStrategy for SegoviaCapitalStrategy {
    fn region(&self) -> DutyRegion {
        DutyRegion::SegoviaCapital
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

        let mut parser = CapitalParser::new(resolution.year);
        for page in pages {
            for line in page.text.lines() {
                parser.feed_line(line);
            }
        }

        // Scrambled reading order leaves the text pass empty; recover the
        // cells geometrically instead.
        if parser.assignments.is_empty() {
            parser = CapitalParser::new(resolution.year);
            for page in pages {
                parser.scan_page(page);
            }
        }

        out.assignments = parser.assignments;
        out.skipped_lines = parser.skipped_lines;
        Ok(out)
    }
}

/// One pharmacy block being accumulated: name, address, phone + extra.
#[derive(Debug, Default, Clone)]
struct PendingPharmacy {
    name: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    extra: Option<String>,
}

impl PendingPharmacy {
    fn complete(&self) -> bool {
        self.name.is_some() && self.address.is_some() && self.phone.is_some()
    }

    fn build(&self) -> Pharmacy {
        Pharmacy {
            name: self.name.clone().unwrap_or_default(),
            address: self.address.clone().unwrap_or_default(),
            phone: self
                .phone
                .clone()
                .unwrap_or_else(|| PHONE_NOT_AVAILABLE.to_string()),
            extra_info: self.extra.clone().unwrap_or_default(),
        }
    }
}

/// The record carried across lines: date plus both shift blocks. Flushed
/// only when every required field of both shifts is present.
#[derive(Debug, Default, Clone)]
struct PendingRecord {
    date: Option<DutyDate>,
    day: PendingPharmacy,
    night: PendingPharmacy,
}

impl PendingRecord {
    fn complete(&self) -> bool {
        self.date.is_some() && self.day.complete() && self.night.complete()
    }
}

struct CapitalParser {
    year: i32,
    last_month: Option<u32>,
    pending: PendingRecord,
    assignments: Vec<RawAssignment>,
    skipped_lines: usize,
}

impl CapitalParser {
    fn new(starting_year: i32) -> CapitalParser {
        CapitalParser {
            year: starting_year,
            last_month: None,
            pending: PendingRecord::default(),
            assignments: Vec::new(),
            skipped_lines: 0,
        }
    }

    // ----- pure-text single pass ------------------------------------------

    fn feed_line(&mut self, line: &str) {
        let line = locale::normalize_whitespace(line);
        if line.is_empty() {
            return;
        }

        if let Some(date) = self.try_date_line(&line) {
            if self.pending.date.is_some() {
                debug!(date = %date, "new date before record completed, dropping partial");
            }
            self.pending = PendingRecord {
                date: Some(date),
                ..PendingRecord::default()
            };
            return;
        }

        if FARMACIA_MARK.is_match(&line) {
            self.feed_names(&line);
        } else if self.pending.date.is_some() && ADDRESS_ANCHOR.is_match(&line) {
            self.feed_addresses(&line);
        } else if self.pending.date.is_some() && PHONE.is_match(&line) {
            self.feed_phones(&line);
        } else {
            self.skipped_lines += 1;
            debug!(line = %line, "unrecognized capital roster line, skipping");
        }

        if self.pending.complete() {
            self.flush();
        }
    }

    /// Composite name line: day and night pharmacy names concatenated.
    /// Split at the second "FARMACIA" marker; a single-marker line fills
    /// whichever shift still lacks a name.
    fn feed_names(&mut self, line: &str) {
        let marks: Vec<usize> = FARMACIA_MARK.find_iter(line).map(|m| m.start()).collect();
        if marks.len() >= 2 {
            self.pending.day.name = Some(line[..marks[1]].trim().to_string());
            self.pending.night.name = Some(line[marks[1]..].trim().to_string());
        } else if self.pending.day.name.is_none() {
            self.pending.day.name = Some(line.trim().to_string());
        } else {
            self.pending.night.name = Some(line.trim().to_string());
        }
    }

    fn feed_addresses(&mut self, line: &str) {
        let anchors: Vec<usize> = ADDRESS_ANCHOR.find_iter(line).map(|m| m.start()).collect();
        if anchors.len() >= 2 {
            self.pending.day.address = Some(line[..anchors[1]].trim().to_string());
            self.pending.night.address = Some(line[anchors[1]..].trim().to_string());
        } else if self.pending.day.address.is_none() {
            self.pending.day.address = Some(line.trim().to_string());
        } else {
            self.pending.night.address = Some(line.trim().to_string());
        }
    }

    fn feed_phones(&mut self, line: &str) {
        for (phone, extra) in split_phones(line) {
            let slot = if self.pending.day.phone.is_none() {
                &mut self.pending.day
            } else {
                &mut self.pending.night
            };
            slot.phone = Some(phone);
            if !extra.is_empty() {
                slot.extra = Some(extra);
            }
        }
    }

    fn try_date_line(&mut self, line: &str) -> Option<DutyDate> {
        let caps = CAPITAL_DATE.captures(line)?;
        let day: u32 = caps[1].parse().ok()?;
        let month = locale::month_from_name(&caps[2])?;

        if let Some(explicit) = caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok()) {
            // In-line year markers drive the running year directly.
            self.year = explicit;
        } else if day == 1 && month == 1 && self.last_month == Some(12) {
            self.year += 1;
        }

        NaiveDate::from_ymd_opt(self.year, month, day)?;
        self.last_month = Some(month);
        Some(DutyDate::new(day, month, self.year))
    }

    fn flush(&mut self) {
        let record = std::mem::take(&mut self.pending);
        let date = match record.date {
            Some(d) => d,
            None => return,
        };
        self.assignments.push(RawAssignment {
            location: DutyLocation::SegoviaCapital,
            date,
            span: DutyTimeSpan::DayCapital,
            pharmacies: vec![record.day.build()],
        });
        self.assignments.push(RawAssignment {
            location: DutyLocation::SegoviaCapital,
            date,
            span: DutyTimeSpan::NightCapital,
            pharmacies: vec![record.night.build()],
        });
    }

    // ----- geometric column fallback --------------------------------------

    fn scan_page(&mut self, page: &PageContent) {
        let cells = column_bands(page);
        let coherent = |texts: &[String]| {
            is_date_cell(&texts[0]) && is_pharmacy_cell(&texts[1]) && is_pharmacy_cell(&texts[2])
        };

        let mut next_y = columns::find_first_coherent_row(
            page,
            &cells,
            0.0,
            page.height,
            ROW_HEIGHT,
            SCAN_STEP,
            &coherent,
        );
        if next_y.is_none() {
            debug!(page = page.page_number, "no coherent capital row on page");
        }

        while let Some(y) = next_y {
            let texts: Vec<String> = cells
                .iter()
                .map(|band| columns::text_in_rect(page, *band, y, ROW_HEIGHT))
                .collect();
            self.consume_row(&texts);
            next_y = columns::find_first_coherent_row(
                page,
                &cells,
                y + ROW_HEIGHT * 0.8,
                page.height,
                ROW_HEIGHT,
                SCAN_STEP,
                &coherent,
            );
        }
    }

    fn consume_row(&mut self, texts: &[String]) {
        let date_line = locale::normalize_whitespace(&texts[0]);
        let Some(date) = self.try_date_line(&date_line) else {
            self.skipped_lines += 1;
            return;
        };
        let (Some(day), Some(night)) = (pharmacy_from_cell(&texts[1]), pharmacy_from_cell(&texts[2]))
        else {
            self.skipped_lines += 1;
            return;
        };

        self.assignments.push(RawAssignment {
            location: DutyLocation::SegoviaCapital,
            date,
            span: DutyTimeSpan::DayCapital,
            pharmacies: vec![day],
        });
        self.assignments.push(RawAssignment {
            location: DutyLocation::SegoviaCapital,
            date,
            span: DutyTimeSpan::NightCapital,
            pharmacies: vec![night],
        });
    }
}

/// Column x-ranges from the page margins and the date-column width ratio.
fn column_bands(page: &PageContent) -> [ColumnBand; 3] {
    let margin = page.width * MARGIN_RATIO;
    let usable = page.width - 2.0 * margin;
    let date_width = usable * DATE_COL_RATIO;
    let pharmacy_width = (usable - date_width) / 2.0;
    [
        ColumnBand::new(margin, date_width),
        ColumnBand::new(margin + date_width, pharmacy_width),
        ColumnBand::new(margin + date_width + pharmacy_width, pharmacy_width),
    ]
}

/// A well-formed date cell is exactly one line matching the date pattern.
fn is_date_cell(text: &str) -> bool {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    match (lines.next(), lines.next()) {
        (Some(line), None) => CAPITAL_DATE.is_match(&locale::normalize_whitespace(line)),
        _ => false,
    }
}

/// A well-formed pharmacy cell is exactly three lines carrying the marker.
fn is_pharmacy_cell(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines.len() == 3 && FARMACIA_MARK.is_match(text)
}

fn pharmacy_from_cell(text: &str) -> Option<Pharmacy> {
    let lines: Vec<String> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(locale::normalize_whitespace)
        .collect();
    if lines.len() != 3 {
        return None;
    }
    let (phone, extra) = split_phones(&lines[2])
        .into_iter()
        .next()
        .unwrap_or_else(|| (PHONE_NOT_AVAILABLE.to_string(), String::new()));
    Some(Pharmacy {
        name: lines[0].clone(),
        address: lines[1].clone(),
        phone,
        extra_info: extra,
    })
}

/// All phone numbers on a line, each paired with the free text that
/// follows it up to the next phone number.
fn split_phones(line: &str) -> Vec<(String, String)> {
    let matches: Vec<regex::Match> = PHONE.find_iter(line).collect();
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let tail_end = matches
                .get(i + 1)
                .map(|next| next.start())
                .unwrap_or(line.len());
            let extra = line[m.end()..tail_end].trim().to_string();
            (m.as_str().to_string(), extra)
        })
        .collect()
}
