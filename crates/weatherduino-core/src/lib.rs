// weatherduino-core: Classification, field mapping, and station lifecycle
// between weatherduino-api and consumers (CLI).

pub mod classify;
pub mod config;
pub mod entity;
pub mod error;
pub mod fields;
pub mod payload;
pub mod station;

// ── Primary re-exports ──────────────────────────────────────────────
pub use classify::{DeviceKind, classify};
pub use config::StationConfig;
pub use entity::{DeviceInfo, SensorEntity, SensorMetadata, SensorSource, build_entities};
pub use error::CoreError;
pub use fields::{FieldDef, SensorClass, SensorValue, Transform, fields_for};
pub use payload::Payload;
pub use station::{PollState, Station, StationSnapshot};
