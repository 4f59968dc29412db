use guardia_core::error::GuardiaError;
use guardia_core::model::DutyRegion;
use std::path::PathBuf;

use crate::output;

pub fn run(
    pdf_file: PathBuf,
    region: &str,
    url: Option<&str>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), GuardiaError> {
    let region = DutyRegion::from_str_loose(region)
        .ok_or_else(|| GuardiaError::UnknownRegion(region.to_string()))?;

    let pdf_bytes = std::fs::read(&pdf_file)?;
    let outcome = guardia_core::parse_schedules_from_pdf(region, &pdf_bytes, url);

    for warning in &outcome.warnings {
        eprintln!("  warning: {warning}");
    }
    if outcome.skipped_lines > 0 {
        eprintln!("  {} line(s) skipped during parsing", outcome.skipped_lines);
    }

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&outcome)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Parsed {} schedule(s), written to {}",
                outcome.entry_count(),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&outcome)?,
            _ => print!("{}", output::table::format_outcome(&outcome)),
        },
    }

    Ok(())
}
