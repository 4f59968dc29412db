//! El Espinar roster: same row-oriented shape as Cuéllar, but the pharmacy
//! is identified by an address fragment or by the San Rafael town suffix,
//! because the printed label flips between street and town across document
//! versions.

use crate::directory;
use crate::error::GuardiaError;
use crate::extraction::PageContent;
use crate::model::{DutyLocation, DutyRegion, Pharmacy};
use crate::strategies::roster::RosterMachine;
use crate::strategies::{ParsingStrategy, StrategyOutput};
use crate::year::resolve_year;
use chrono::NaiveDate;

pub struct ElEspinarStrategy;

impl ParsingStrategy for ElEspinarStrategy {
    fn region(&self) -> DutyRegion {
        DutyRegion::ElEspinar
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

        let mut machine = RosterMachine::new(DutyLocation::ElEspinar, resolution.year);
        for page in pages {
            for line in page.text.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                machine.feed(line, &find_pharmacies);
            }
        }

        out.assignments = machine.assignments;
        out.skipped_lines = machine.skipped_lines;
        Ok(out)
    }
}

fn find_pharmacies(line: &str) -> Option<Vec<Pharmacy>> {
    directory::find_el_espinar(line).map(|p| vec![p.clone()])
}
