//! One-shot poll: fetch, classify, print every exposed sensor.

use weatherduino_core::{Station, StationConfig, build_entities};

use crate::error::CliError;
use crate::output;

pub async fn handle(config: StationConfig) -> Result<(), CliError> {
    let station = Station::new(config)?;
    let snap = station.refresh().await?;

    let entities = build_entities(station.entry_id(), snap.kind, &snap.payload);
    let info = station.device_info()?;

    println!("{}", output::device_header(&info));

    if entities.is_empty() {
        println!(
            "payload matched no known device shape ({} keys); nothing to show",
            snap.payload.len()
        );
        return Ok(());
    }

    println!("{}", output::sensor_table(&entities, &snap.payload));
    Ok(())
}
