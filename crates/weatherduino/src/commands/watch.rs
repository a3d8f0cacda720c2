//! Continuous polling: start the station loop and reprint the sensor
//! table on every refresh until Ctrl-C or `--count` refreshes.

use owo_colors::OwoColorize;
use tracing::debug;

use weatherduino_core::{PollState, Station, StationConfig};

use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::output;

pub async fn handle(config: StationConfig, args: WatchArgs) -> Result<(), CliError> {
    let interval = config.scan_interval;
    let station = Station::new(config)?;

    // Subscribe before starting so the first published snapshot counts
    // as a change.
    let mut snapshots = station.snapshots();
    let mut states = station.state();

    station.start().await?;

    let entities = station.entities()?;
    let info = station.device_info()?;
    println!("{}", output::device_header(&info));
    println!(
        "polling every {} (Ctrl-C to stop)",
        humantime::format_duration(interval)
    );

    // start() already produced the first snapshot; print it now.
    snapshots.mark_unchanged();
    states.mark_unchanged();
    let mut printed: u64 = 0;
    if let Some(snap) = station.latest() {
        println!("{}", output::sensor_table(&entities, &snap.payload));
        printed += 1;
    }

    let result = loop {
        if args.count.is_some_and(|n| printed >= n) {
            break Ok(());
        }

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                break signal.map_err(CliError::from);
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let snap = snapshots.borrow_and_update().clone();
                if let Some(snap) = snap {
                    println!(
                        "{}",
                        format!("refreshed {}", snap.fetched_at.format("%H:%M:%S")).dimmed()
                    );
                    println!("{}", output::sensor_table(&entities, &snap.payload));
                    printed += 1;
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let state = states.borrow_and_update().clone();
                if let PollState::Failing { consecutive_errors } = state {
                    eprintln!(
                        "{} poll failed ({consecutive_errors} in a row); values frozen at last known good",
                        "warning:".yellow().bold()
                    );
                }
            }
        }
    };

    debug!("watch loop finished, stopping station");
    station.stop().await;
    result
}
