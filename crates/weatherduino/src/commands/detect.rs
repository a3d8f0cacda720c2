//! Classification probe: poll once, print the inferred device type and
//! the payload keys that drove the decision.

use weatherduino_core::classify::{AQM2_KEYS, AQM3_KEYS, FOUR_PRO_KEYS};
use weatherduino_core::{DeviceKind, Station, StationConfig};

use crate::error::CliError;

pub async fn handle(config: StationConfig) -> Result<(), CliError> {
    let forced = config.forced_kind;
    let station = Station::new(config)?;
    let snap = station.refresh().await?;

    if let Some(kind) = forced {
        println!("{kind} (forced by configuration; payload keys not consulted)");
        return Ok(());
    }

    let evidence: Vec<&str> = match snap.kind {
        DeviceKind::FourPro => present(&snap.payload, FOUR_PRO_KEYS),
        DeviceKind::Aqm3 => present(&snap.payload, AQM3_KEYS),
        DeviceKind::Aqm2 => present(&snap.payload, AQM2_KEYS),
        DeviceKind::WeatherDisplay => vec!["T", "H"],
        DeviceKind::Unknown => Vec::new(),
    };

    println!("{}", snap.kind);
    if evidence.is_empty() {
        println!(
            "no classification key matched; payload keys: {}",
            snap.payload.keys().collect::<Vec<_>>().join(", ")
        );
    } else {
        println!("evidence: {}", evidence.join(", "));
    }
    Ok(())
}

fn present<'a>(
    payload: &weatherduino_core::Payload,
    keys: &'a [&'a str],
) -> Vec<&'a str> {
    keys.iter().copied().filter(|k| payload.contains(k)).collect()
}
