//! Final schedule assembly: deduplicate, merge shifts, sort, group.

use crate::model::{DutyDate, DutyLocation, DutyTimeSpan, Pharmacy, PharmacySchedule, ScheduleMap};
use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};

/// One raw duty assignment as emitted by a strategy, before assembly.
#[derive(Debug, Clone)]
pub struct RawAssignment {
    pub location: DutyLocation,
    pub date: DutyDate,
    pub span: DutyTimeSpan,
    pub pharmacies: Vec<Pharmacy>,
}

/// Assemble raw assignments into the final per-location, date-ordered map.
///
/// Re-scanned overlapping rows produce exact duplicates; the first
/// occurrence of a `(location, date, span)` wins and later ones are
/// dropped. Distinct spans of one date merge into a single
/// [`PharmacySchedule`]. Ordering is ascending `(year, month, day)` with
/// `fallback_year` standing in for entries whose year is still unresolved,
/// so the output is total and deterministic for a fixed input.
pub fn assemble(assignments: Vec<RawAssignment>, fallback_year: i32) -> ScheduleMap {
    let mut seen: HashSet<(DutyLocation, (i32, u32, u32), DutyTimeSpan)> = HashSet::new();

    let by_location = assignments
        .into_iter()
        .filter(|a| {
            seen.insert((a.location, a.date.sort_key(fallback_year), a.span))
        })
        .into_group_map_by(|a| a.location);

    let mut out = ScheduleMap::new();
    for (location, entries) in by_location {
        let mut by_date: BTreeMap<(i32, u32, u32), PharmacySchedule> = BTreeMap::new();
        for entry in entries {
            let schedule = by_date
                .entry(entry.date.sort_key(fallback_year))
                .or_insert_with(|| PharmacySchedule::new(entry.date));
            schedule.shifts.entry(entry.span).or_insert(entry.pharmacies);
        }
        out.insert(location, by_date.into_values().collect());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(day: u32, month: u32, span: DutyTimeSpan) -> RawAssignment {
        RawAssignment {
            location: DutyLocation::Cuellar,
            date: DutyDate::new(day, month, 2025),
            span,
            pharmacies: vec![Pharmacy::new("Farmacia Test", "C/ Mayor, 1", "921 000 000")],
        }
    }

    #[test]
    fn test_sorted_ascending_by_date() {
        let input = vec![
            assignment(7, 3, DutyTimeSpan::FullDay),
            assignment(1, 1, DutyTimeSpan::FullDay),
            assignment(15, 2, DutyTimeSpan::FullDay),
        ];
        let map = assemble(input, 2025);
        let schedules = &map[&DutyLocation::Cuellar];
        let keys: Vec<(u32, u32)> = schedules.iter().map(|s| (s.date.month, s.date.day)).collect();
        assert_eq!(keys, vec![(1, 1), (2, 15), (3, 7)]);
    }

    #[test]
    fn test_duplicate_date_span_first_wins() {
        let mut second = assignment(1, 1, DutyTimeSpan::FullDay);
        second.pharmacies = vec![Pharmacy::new("Farmacia Otra", "C/ Real, 2", "921 111 111")];
        let input = vec![assignment(1, 1, DutyTimeSpan::FullDay), second];

        let map = assemble(input, 2025);
        let schedules = &map[&DutyLocation::Cuellar];
        assert_eq!(schedules.len(), 1);
        assert_eq!(
            schedules[0].shifts[&DutyTimeSpan::FullDay][0].name,
            "Farmacia Test"
        );
    }

    #[test]
    fn test_day_and_night_merge_into_one_schedule() {
        let input = vec![
            assignment(1, 1, DutyTimeSpan::DayCapital),
            assignment(1, 1, DutyTimeSpan::NightCapital),
        ];
        let map = assemble(input, 2025);
        let schedules = &map[&DutyLocation::Cuellar];
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].shifts.len(), 2);
    }

    #[test]
    fn test_unresolved_year_sorts_with_fallback() {
        let mut unresolved = assignment(2, 1, DutyTimeSpan::FullDay);
        unresolved.date.year = None;
        let input = vec![assignment(3, 1, DutyTimeSpan::FullDay), unresolved];

        let map = assemble(input, 2025);
        let schedules = &map[&DutyLocation::Cuellar];
        assert_eq!(schedules[0].date.day, 2);
        assert_eq!(schedules[1].date.day, 3);
    }

    #[test]
    fn test_round_trip_count() {
        let input: Vec<RawAssignment> =
            (1..=7).map(|d| assignment(d, 1, DutyTimeSpan::FullDay)).collect();
        let map = assemble(input, 2025);
        assert_eq!(map[&DutyLocation::Cuellar].len(), 7);
    }

    #[test]
    fn test_locations_grouped_independently() {
        let mut rural = assignment(1, 1, DutyTimeSpan::FullDay);
        rural.location = DutyLocation::Riaza;
        let input = vec![assignment(1, 1, DutyTimeSpan::FullDay), rural];

        let map = assemble(input, 2025);
        assert_eq!(map.len(), 2);
        assert!(map.contains_key(&DutyLocation::Cuellar));
        assert!(map.contains_key(&DutyLocation::Riaza));
    }
}
