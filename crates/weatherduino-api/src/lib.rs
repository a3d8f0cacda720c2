// weatherduino-api: Async Rust client for the WeatherDuino local JSON endpoint

pub mod client;
pub mod error;
pub mod transport;

pub use client::{RawPayload, StationClient, device_id};
pub use error::Error;
pub use transport::TransportConfig;
