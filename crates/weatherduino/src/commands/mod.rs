//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod detect;
pub mod fetch;
pub mod watch;
