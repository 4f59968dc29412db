use guardia_core::error::GuardiaError;
use guardia_core::ParseOutcome;

pub fn print(outcome: &ParseOutcome) -> Result<(), GuardiaError> {
    let json = serde_json::to_string_pretty(outcome)?;
    println!("{json}");
    Ok(())
}
