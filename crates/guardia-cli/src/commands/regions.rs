use guardia_core::error::GuardiaError;
use guardia_core::model::DutyRegion;

pub fn run() -> Result<(), GuardiaError> {
    for region in DutyRegion::ALL {
        println!("{region}");
        for location in region.locations() {
            println!("  - {location}");
        }
    }
    Ok(())
}
