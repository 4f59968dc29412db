use guardia_core::model::PharmacySchedule;
use guardia_core::ParseOutcome;

/// Plain-text rendering of a parse outcome, one block per duty location.
pub fn format_outcome(outcome: &ParseOutcome) -> String {
    let mut out = String::new();

    if let Some(year) = &outcome.year {
        out.push_str(&format!(
            "Resolved year: {} (source: {:?})\n\n",
            year.year, year.source
        ));
    }

    if outcome.schedules.is_empty() {
        out.push_str("No schedules found.\n");
        return out;
    }

    for (location, schedules) in &outcome.schedules {
        out.push_str(&format!("=== {location} ===\n\n"));
        for schedule in schedules {
            format_schedule(&mut out, schedule);
        }
        out.push('\n');
    }

    out
}

fn format_schedule(out: &mut String, schedule: &PharmacySchedule) {
    out.push_str(&format!("  {}\n", schedule.date));
    for (span, pharmacies) in &schedule.shifts {
        for pharmacy in pharmacies {
            out.push_str(&format!(
                "    {:<12} {}  {}  {}\n",
                span.to_string(),
                pharmacy.name,
                pharmacy.address,
                pharmacy.phone
            ));
            if !pharmacy.extra_info.is_empty() {
                out.push_str(&format!("                 {}\n", pharmacy.extra_info));
            }
        }
    }
}
