//! Per-region parsing strategies.
//!
//! Each municipality publishes its roster in a structurally different PDF
//! layout, so recognition logic is one implementation of
//! [`ParsingStrategy`] per region, selected through [`strategy_for`].
//! Strategies hold no state of their own; every per-document accumulator
//! (pending lines, running year) lives in values created inside `parse`,
//! so instances are freely shared and re-entrant.

pub mod cuellar;
pub mod el_espinar;
pub mod roster;
pub mod segovia_capital;
pub mod segovia_rural;

use crate::assembler::RawAssignment;
use crate::error::GuardiaError;
use crate::extraction::PageContent;
use crate::model::DutyRegion;
use crate::year::YearResolution;
use chrono::NaiveDate;

/// Raw result of one strategy run, before assembly.
#[derive(Debug, Default)]
pub struct StrategyOutput {
    pub assignments: Vec<RawAssignment>,
    pub year: Option<YearResolution>,
    pub warnings: Vec<String>,
    pub skipped_lines: usize,
}

impl StrategyOutput {
    pub fn push_year(&mut self, resolution: &YearResolution) {
        if let Some(w) = &resolution.warning {
            self.warnings.push(w.clone());
        }
        self.year = Some(resolution.clone());
    }
}

/// Common contract of the four region parsers.
pub trait ParsingStrategy: Send + Sync {
    fn region(&self) -> DutyRegion;

    /// Parse extracted pages into raw duty assignments. `today` anchors
    /// year resolution; faults below the document level must be absorbed
    /// into fewer assignments, not errors.
    fn parse(
        &self,
        pages: &[PageContent],
        source_url: Option<&str>,
        today: NaiveDate,
    ) -> Result<StrategyOutput, GuardiaError>;
}

/// Registry mapping a region to its strategy.
pub fn strategy_for(region: DutyRegion) -> Box<dyn ParsingStrategy> {
    match region {
        DutyRegion::Cuellar => Box::new(cuellar::CuellarStrategy),
        DutyRegion::ElEspinar => Box::new(el_espinar::ElEspinarStrategy),
        DutyRegion::SegoviaCapital => Box::new(segovia_capital::SegoviaCapitalStrategy),
        DutyRegion::SegoviaRural => Box::new(segovia_rural::SegoviaRuralStrategy),
    }
}
