//! Shared line machinery for the row-oriented rosters (Cuéllar, El
//! Espinar): `dd-mmm` token expansion, date ranges, the running-year
//! accumulator, and the pending-dates/pending-pharmacy state machine.
//!
//! A line may carry dates, a pharmacy, or both; both orderings occur across
//! page sections, so whichever half arrives first is held until the other
//! closes the set. Lines matching neither classification are counted and
//! skipped, never fatal.

use crate::assembler::RawAssignment;
use crate::locale::{self, DATE_TOKEN};
use crate::model::{DutyDate, DutyLocation, DutyTimeSpan, Pharmacy};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// State folded over the lines of one document.
pub struct RosterMachine {
    location: DutyLocation,
    year: i32,
    last_month: Option<u32>,
    pending_dates: Vec<DutyDate>,
    pending_pharmacies: Option<Vec<Pharmacy>>,
    pub assignments: Vec<RawAssignment>,
    pub skipped_lines: usize,
}

impl RosterMachine {
    pub fn new(location: DutyLocation, starting_year: i32) -> RosterMachine {
        RosterMachine {
            location,
            year: starting_year,
            last_month: None,
            pending_dates: Vec::new(),
            pending_pharmacies: None,
            assignments: Vec::new(),
            skipped_lines: 0,
        }
    }

    /// The running year after the lines consumed so far.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Consume one roster line. `find_pharmacy` is the per-region
    /// classifier: the pharmacies a line names, if any.
    pub fn feed(&mut self, line: &str, find_pharmacy: &dyn Fn(&str) -> Option<Vec<Pharmacy>>) {
        let normalized = locale::normalize_whitespace(line);
        if normalized.is_empty() {
            return;
        }

        let dates = self.expand_dates(&normalized);
        let pharmacies = find_pharmacy(&normalized);

        match (dates.is_empty(), pharmacies) {
            // Composite line: both halves present, emit directly.
            (false, Some(found)) => self.flush(dates, found),
            (false, None) => match self.pending_pharmacies.take() {
                Some(found) => self.flush(dates, found),
                None => self.pending_dates.extend(dates),
            },
            (true, Some(found)) => {
                if self.pending_dates.is_empty() {
                    self.pending_pharmacies = Some(found);
                } else {
                    let dates = std::mem::take(&mut self.pending_dates);
                    self.flush(dates, found);
                }
            }
            (true, None) => {
                self.skipped_lines += 1;
                debug!(line = %normalized, "line matches neither dates nor pharmacy, skipping");
            }
        }
    }

    fn flush(&mut self, dates: Vec<DutyDate>, pharmacies: Vec<Pharmacy>) {
        for date in dates {
            self.assignments.push(RawAssignment {
                location: self.location,
                date,
                span: DutyTimeSpan::FullDay,
                pharmacies: pharmacies.clone(),
            });
        }
    }

    /// Expand every `dd-mmm` token on the line into dated entries, as a
    /// range when two tokens are joined by "al", else as a list. The
    /// running year advances when a `01-ene` token follows December
    /// entries (a document crossing New Year).
    fn expand_dates(&mut self, line: &str) -> Vec<DutyDate> {
        let tokens: Vec<(u32, u32)> = DATE_TOKEN
            .captures_iter(line)
            .filter_map(|c| {
                let day: u32 = c[1].parse().ok()?;
                let month = locale::month_from_abbrev(&c[2])?;
                Some((day, month))
            })
            .collect();

        if tokens.is_empty() {
            return Vec::new();
        }

        if tokens.len() == 2 && is_range(line) {
            if let Some(dates) = self.expand_range(tokens[0], tokens[1]) {
                return dates;
            }
        }

        tokens
            .into_iter()
            .filter_map(|(day, month)| self.date_for(day, month))
            .collect()
    }

    /// One standalone token, advanced through the running-year rule.
    fn date_for(&mut self, day: u32, month: u32) -> Option<DutyDate> {
        if day == 1 && month == 1 && self.last_month == Some(12) {
            self.year += 1;
        }
        if NaiveDate::from_ymd_opt(self.year, month, day).is_none() {
            debug!(day, month, "impossible date token, skipping");
            return None;
        }
        self.last_month = Some(month);
        Some(DutyDate::new(day, month, self.year))
    }

    /// "dd-mmm al dd-mmm": walk the calendar day by day, crossing month
    /// and year boundaries as needed.
    fn expand_range(&mut self, start: (u32, u32), end: (u32, u32)) -> Option<Vec<DutyDate>> {
        if start.0 == 1 && start.1 == 1 && self.last_month == Some(12) {
            self.year += 1;
        }
        let first = NaiveDate::from_ymd_opt(self.year, start.1, start.0)?;
        let end_year = if (end.1, end.0) < (start.1, start.0) {
            self.year + 1
        } else {
            self.year
        };
        let last = NaiveDate::from_ymd_opt(end_year, end.1, end.0)?;
        if last < first {
            return None;
        }

        let dates: Vec<DutyDate> = first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|d| DutyDate::new(d.day(), d.month(), d.year()))
            .collect();

        self.year = last.year();
        self.last_month = Some(last.month());
        Some(dates)
    }
}

/// Whether the two date tokens on this line are joined by "al".
fn is_range(line: &str) -> bool {
    let folded = locale::fold_ascii(line);
    let mut matches = DATE_TOKEN.find_iter(&folded);
    let (first, second) = (matches.next(), matches.next());
    match (first, second) {
        (Some(a), Some(b)) if b.start() > a.end() => {
            let between = &folded[a.end()..b.start()];
            between.split_whitespace().any(|w| w == "AL" || w == "A")
        }
        _ => false,
    }
}
