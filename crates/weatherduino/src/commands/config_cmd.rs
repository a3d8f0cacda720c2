//! `config` subcommands: show, path, init. No network access.

use std::fs;

use weatherduino_config::{ConfigError, config_path, load_config};

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::error::CliError;

const STARTER_CONFIG: &str = r#"# weatherduino configuration
#
# Each [stations.<name>] block describes one device. Per-key overrides
# live in an optional [stations.<name>.options] block and win over the
# block they shadow.

# default_station = "roof"

# [stations.roof]
# host = "192.168.1.50"
# port = 80
# path = "/json"
# device_type = "auto"   # auto | 4pro | weatherdisplay | aqm2 | aqm3
# scan_interval = 30

# [stations.roof.options]
# scan_interval = 10
"#;

pub fn handle(args: ConfigArgs) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => show(),
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }
        ConfigCommand::Init => init(),
    }
}

fn show() -> Result<(), CliError> {
    let cfg = load_config()?;
    let rendered = toml::to_string_pretty(&cfg).map_err(ConfigError::Serialization)?;
    print!("{rendered}");
    Ok(())
}

/// Write the starter file unless one already exists.
fn init() -> Result<(), CliError> {
    let path = config_path();
    if path.exists() {
        println!("config file already exists at {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, STARTER_CONFIG)?;
    println!("wrote starter config to {}", path.display());
    Ok(())
}
