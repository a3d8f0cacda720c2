//! Output formatting for sensor readings.
//!
//! Table rendering uses `tabled`; the device header line is colored with
//! `owo-colors` when stdout is a terminal.

use std::io::{self, IsTerminal};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use weatherduino_core::{DeviceInfo, Payload, SensorEntity, SensorSource};

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "Sensor")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Kind")]
    kind: String,
}

/// Render every entity's current value against `payload`.
pub fn sensor_table(entities: &[SensorEntity], payload: &Payload) -> String {
    let rows: Vec<SensorRow> = entities
        .iter()
        .map(|entity| {
            let meta = entity.metadata();
            SensorRow {
                name: meta.name.to_owned(),
                value: entity
                    .current_value(payload)
                    .map_or_else(|| "-".to_owned(), |v| v.to_string()),
                unit: meta.unit.unwrap_or("").to_owned(),
                kind: if meta.diagnostic {
                    "diagnostic".to_owned()
                } else {
                    meta.class.map(|c| c.to_string()).unwrap_or_default()
                },
            }
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// One-line device header: `● RX-WeatherDuino-4Pro (WeatherDuino 4Pro) http://...`
pub fn device_header(info: &DeviceInfo) -> String {
    if io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err() {
        format!(
            "{} {} ({}) {}",
            "●".green(),
            info.name.bold(),
            info.model,
            info.configuration_url.dimmed()
        )
    } else {
        format!("* {} ({}) {}", info.name, info.model, info.configuration_url)
    }
}
