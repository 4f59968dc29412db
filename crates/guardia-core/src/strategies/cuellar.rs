//! Cuéllar roster: row-oriented text, one full-day pharmacy per date.
//!
//! Lines carry `dd-mmm` tokens (single dates, comma lists, or "al" ranges)
//! and/or a street fragment naming the pharmacy. A legacy late-summer
//! format spells dates out in long form ("DOMINGO 31 DE AGOSTO Y LUNES 1 DE
//! SEPTIEMBRE"); those are rewritten into `dd-mmm` shape before entering
//! the common pipeline.

use crate::directory;
use crate::error::GuardiaError;
use crate::extraction::PageContent;
use crate::locale::{self, LONG_DATE_TOKEN};
use crate::model::{DutyLocation, DutyRegion, Pharmacy};
use crate::strategies::roster::RosterMachine;
use crate::strategies::{ParsingStrategy, StrategyOutput};
use crate::year::resolve_year;
use chrono::NaiveDate;
use std::borrow::Cow;

pub struct CuellarStrategy;

impl ParsingStrategy for CuellarStrategy {
    fn region(&self) -> DutyRegion {
        DutyRegion::Cuellar
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

        let mut machine = RosterMachine::new(DutyLocation::Cuellar, resolution.year);
        for page in pages {
            for line in page.text.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let line = rewrite_long_dates(line);
                machine.feed(&line, &find_pharmacies);
            }
        }

        out.assignments = machine.assignments;
        out.skipped_lines = machine.skipped_lines;
        Ok(out)
    }
}

fn find_pharmacies(line: &str) -> Option<Vec<Pharmacy>> {
    directory::find_cuellar(line).map(|p| vec![p.clone()])
}

/// Rewrite long-form day references into `dd-mmm` tokens: "31 DE AGOSTO Y
/// 1 DE SEPTIEMBRE" becomes "31-ago 01-sep". Non-month words after "de"
/// are left untouched, so ordinary prose survives unchanged.
fn rewrite_long_dates(line: &str) -> Cow<'_, str> {
    LONG_DATE_TOKEN.replace_all(line, |caps: &regex::Captures| {
        let abbrev = locale::month_from_name(&caps[2]).and_then(locale::month_abbrev);
        match abbrev {
            Some(abbrev) => format!("{:0>2}-{}", &caps[1], abbrev),
            None => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DutyDate;

    fn page(text: &str) -> PageContent {
        PageContent {
            page_number: 1,
            width: 595.0,
            height: 842.0,
            text: text.to_string(),
            chars: Vec::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_range_line_with_street_fragment() {
        let pages = [page("FARMACIAS DE GUARDIA 2025\n01-ene al 07-ene Av C.J. CELA\n")];
        let out = CuellarStrategy.parse(&pages, None, today()).unwrap();

        assert_eq!(out.assignments.len(), 7);
        for (i, a) in out.assignments.iter().enumerate() {
            assert_eq!(a.date, DutyDate::new(i as u32 + 1, 1, 2025));
            assert_eq!(a.pharmacies[0].name, "Farmacia Fernando Redondo");
            assert_eq!(a.location, DutyLocation::Cuellar);
        }
    }

    #[test]
    fn test_dates_and_pharmacy_on_separate_lines() {
        let pages = [page("GUARDIAS 2025\n10-mar, 11-mar\nC/ San Francisco, 1\n")];
        let out = CuellarStrategy.parse(&pages, None, today()).unwrap();

        assert_eq!(out.assignments.len(), 2);
        assert_eq!(out.assignments[0].pharmacies[0].name, "Farmacia César Cabrerizo");
    }

    #[test]
    fn test_legacy_long_form_transition() {
        let pages = [page(
            "GUARDIAS 2025\nDOMINGO 31 DE AGOSTO Y LUNES 1 DE SEPTIEMBRE Av C.J. CELA\n",
        )];
        let out = CuellarStrategy.parse(&pages, None, today()).unwrap();

        assert_eq!(out.assignments.len(), 2);
        assert_eq!(out.assignments[0].date, DutyDate::new(31, 8, 2025));
        assert_eq!(out.assignments[1].date, DutyDate::new(1, 9, 2025));
    }

    #[test]
    fn test_unmatched_lines_counted_not_fatal() {
        let pages = [page("AYUNTAMIENTO DE CUELLAR\nTelf: 921 140 014\n01-feb Av C.J. CELA\n")];
        let out = CuellarStrategy.parse(&pages, None, today()).unwrap();

        assert_eq!(out.assignments.len(), 1);
        assert!(out.skipped_lines >= 1);
    }

    #[test]
    fn test_year_from_url_drives_dates() {
        let pages = [page("01-feb Av C.J. CELA\n")];
        let out = CuellarStrategy
            .parse(&pages, Some("https://cuellar.es/guardias-2024.pdf"), today())
            .unwrap();
        assert_eq!(out.assignments[0].date.year, Some(2024));
    }

    #[test]
    fn test_rewrite_leaves_prose_alone() {
        assert_eq!(
            rewrite_long_dates("AYUNTAMIENTO DE CUELLAR"),
            "AYUNTAMIENTO DE CUELLAR"
        );
        assert_eq!(rewrite_long_dates("31 DE AGOSTO"), "31-ago");
    }

    #[test]
    fn test_no_pages_is_empty_not_error() {
        let out = CuellarStrategy.parse(&[], None, today()).unwrap();
        assert!(out.assignments.is_empty());
    }
}
