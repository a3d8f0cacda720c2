// ── Field definitions and value transforms ──
//
// One static table per device variant, each row mapping a raw JSON key
// to a transform and display metadata. The tables are reproduced
// key-for-key from the shipped firmware field sets -- renaming a key or
// changing a unit string here breaks identity for existing consumers.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use strum::Display;

use crate::classify::DeviceKind;
use crate::payload::{Payload, coerce_integer, coerce_numeric};

// ── Units ───────────────────────────────────────────────────────────

pub mod units {
    pub const CELSIUS: &str = "°C";
    pub const PERCENT: &str = "%";
    pub const HECTOPASCAL: &str = "hPa";
    pub const METERS_PER_SECOND: &str = "m/s";
    pub const DEGREES: &str = "°";
    pub const MILLIMETERS: &str = "mm";
    pub const MILLIMETERS_PER_HOUR: &str = "mm/h";
    pub const WATTS_PER_SQUARE_METER: &str = "W/m²";
    pub const PARTS_PER_MILLION: &str = "ppm";
    pub const MICROGRAMS_PER_CUBIC_METER: &str = "µg/m³";
}

// ── Sensor classes ──────────────────────────────────────────────────

/// Semantic category of a sensor, for display and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SensorClass {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
    Irradiance,
    Pm25,
    Pm10,
    Aqi,
    CarbonDioxide,
    Moisture,
    Timestamp,
}

// ── Transforms ──────────────────────────────────────────────────────

/// AQM2 averaging-mode codes, as labeled in the device's own UI.
pub const AVG_MODE_LABELS: &[(i64, &str)] = &[
    (1, "1 hour"),
    (2, "3 hours"),
    (3, "nowcast 12h"),
    (4, "24 hours"),
];

/// How a raw JSON field becomes a sensor value.
///
/// Every transform is total over payloads: an absent key or an
/// unparsable value yields `None`, never an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Raw value unchanged (wind direction degrees, solar radiation).
    Passthrough,
    /// Device-scaled integer ÷ 10 (`Tin=210` → `21.0`). String values
    /// are comma-coerced *before* scaling: `"215,0"` → `21.5`.
    ScaleTenth,
    /// Unix epoch seconds → absolute UTC timestamp.
    EpochTimestamp,
    /// Integer code → fixed label; unknown codes render as
    /// `unknown (<code>)` rather than failing.
    CodedEnum(&'static [(i64, &'static str)]),
}

impl Transform {
    /// Apply this transform to `key` within `payload`.
    pub fn apply(self, payload: &Payload, key: &str) -> Option<SensorValue> {
        let raw = payload.get(key)?;
        match self {
            Self::Passthrough => passthrough(raw),
            Self::ScaleTenth => coerce_numeric(raw).map(|v| SensorValue::Number(v / 10.0)),
            Self::EpochTimestamp => {
                let secs = coerce_integer(raw)?;
                DateTime::<Utc>::from_timestamp(secs, 0).map(SensorValue::Timestamp)
            }
            Self::CodedEnum(table) => {
                let code = coerce_integer(raw)?;
                let label = table
                    .iter()
                    .find_map(|(c, label)| (*c == code).then_some((*label).to_owned()))
                    .unwrap_or_else(|| format!("unknown ({code})"));
                Some(SensorValue::Text(label))
            }
        }
    }
}

/// Passthrough keeps the device's own representation: integral numbers
/// stay integers, numeric-looking strings are coerced, and anything
/// else is carried as text.
fn passthrough(raw: &Value) -> Option<SensorValue> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .map(SensorValue::Integer)
            .or_else(|| n.as_f64().map(SensorValue::Number)),
        Value::String(s) => Some(match coerce_integer(raw) {
            Some(i) => SensorValue::Integer(i),
            None => match coerce_numeric(raw) {
                Some(f) => SensorValue::Number(f),
                None => SensorValue::Text(s.clone()),
            },
        }),
        _ => None,
    }
}

// ── Sensor values ───────────────────────────────────────────────────

/// A resolved sensor reading.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl SensorValue {
    /// Numeric view, when the value is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }
}

// ── Field definitions ───────────────────────────────────────────────

/// One exposed field of a device variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    /// Raw JSON key in the payload. Doubles as the identity component.
    pub key: &'static str,
    /// Human-readable sensor name.
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub class: Option<SensorClass>,
    pub transform: Transform,
    /// Diagnostic fields describe the device rather than the weather.
    pub diagnostic: bool,
}

impl FieldDef {
    const fn scaled(
        key: &'static str,
        name: &'static str,
        unit: &'static str,
        class: SensorClass,
    ) -> Self {
        Self {
            key,
            name,
            unit: Some(unit),
            class: Some(class),
            transform: Transform::ScaleTenth,
            diagnostic: false,
        }
    }

    const fn raw(key: &'static str, name: &'static str, unit: Option<&'static str>) -> Self {
        Self {
            key,
            name,
            unit,
            class: None,
            transform: Transform::Passthrough,
            diagnostic: false,
        }
    }
}

use SensorClass as C;
use units as U;

/// WeatherDuino 4Pro receiver: full weather station plus optional extra
/// (ES1..ES4) and soil (So1/So2) transmitters.
pub const FOUR_PRO_FIELDS: &[FieldDef] = &[
    FieldDef::scaled("Tin", "Inside Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("Hin", "Inside Humidity", U::PERCENT, C::Humidity),
    FieldDef::scaled("Tout", "Outside Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("Hout", "Outside Humidity", U::PERCENT, C::Humidity),
    FieldDef::scaled("P", "Pressure", U::HECTOPASCAL, C::Pressure),
    FieldDef::scaled("Wsp", "Wind Speed", U::METERS_PER_SECOND, C::WindSpeed),
    FieldDef::scaled("Wgs", "Wind Gust", U::METERS_PER_SECOND, C::WindSpeed),
    FieldDef::raw("Wdir", "Wind Direction", Some(U::DEGREES)),
    FieldDef {
        key: "Rtd",
        name: "Rain Today",
        unit: Some(U::MILLIMETERS),
        class: None,
        transform: Transform::ScaleTenth,
        diagnostic: false,
    },
    FieldDef {
        key: "Rfr",
        name: "Rain Rate",
        unit: Some(U::MILLIMETERS_PER_HOUR),
        class: None,
        transform: Transform::ScaleTenth,
        diagnostic: false,
    },
    FieldDef {
        key: "SR",
        name: "Solar Radiation",
        unit: Some(U::WATTS_PER_SQUARE_METER),
        class: Some(C::Irradiance),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    // UV index has no unit; device still scales it by ten.
    FieldDef {
        key: "UV",
        name: "UV Index",
        unit: None,
        class: None,
        transform: Transform::ScaleTenth,
        diagnostic: false,
    },
    // "C02" is the firmware's own spelling.
    FieldDef {
        key: "C02",
        name: "CO2",
        unit: Some(U::PARTS_PER_MILLION),
        class: Some(C::CarbonDioxide),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    FieldDef {
        key: "PM25",
        name: "PM2.5",
        unit: Some(U::MICROGRAMS_PER_CUBIC_METER),
        class: Some(C::Pm25),
        transform: Transform::ScaleTenth,
        diagnostic: false,
    },
    FieldDef {
        key: "PM100",
        name: "PM10",
        unit: Some(U::MICROGRAMS_PER_CUBIC_METER),
        class: Some(C::Pm10),
        transform: Transform::ScaleTenth,
        diagnostic: false,
    },
    FieldDef {
        key: "AQI",
        name: "Air Quality Index",
        unit: None,
        class: Some(C::Aqi),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    // Extra sensors
    FieldDef::scaled("ES1T", "Extra Sensor 1 Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("ES1H", "Extra Sensor 1 Humidity", U::PERCENT, C::Humidity),
    FieldDef::scaled("ES2T", "Extra Sensor 2 Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("ES2H", "Extra Sensor 2 Humidity", U::PERCENT, C::Humidity),
    FieldDef::scaled("ES3T", "Extra Sensor 3 Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("ES3H", "Extra Sensor 3 Humidity", U::PERCENT, C::Humidity),
    FieldDef::scaled("ES4T", "Extra Sensor 4 Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("ES4H", "Extra Sensor 4 Humidity", U::PERCENT, C::Humidity),
    // Soil sensors
    FieldDef::scaled("So1T", "Soil 1 Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("So1M", "Soil 1 Moisture", U::PERCENT, C::Moisture),
    FieldDef::scaled("So2T", "Soil 2 Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("So2M", "Soil 2 Moisture", U::PERCENT, C::Moisture),
];

/// WeatherDisplay transmitter relay: temperature and humidity only.
/// The `TID` transmitter id feeds entity identity, not a sensor.
pub const WEATHER_DISPLAY_FIELDS: &[FieldDef] = &[
    FieldDef::scaled("T", "Temperature", U::CELSIUS, C::Temperature),
    FieldDef::scaled("H", "Humidity", U::PERCENT, C::Humidity),
];

/// AQM2: EPA-style AQI values plus the configured averaging window.
pub const AQM2_FIELDS: &[FieldDef] = &[
    FieldDef {
        key: "PM25AQI",
        name: "PM2.5 AQI",
        unit: None,
        class: Some(C::Aqi),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    FieldDef {
        key: "PM100AQI",
        name: "PM10 AQI",
        unit: None,
        class: Some(C::Aqi),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    FieldDef {
        key: "AVG_M",
        name: "Averaging Mode",
        unit: None,
        class: None,
        transform: Transform::CodedEnum(AVG_MODE_LABELS),
        diagnostic: true,
    },
];

/// AQM3: raw concentrations (instant + 24h mean) and a sample timestamp.
pub const AQM3_FIELDS: &[FieldDef] = &[
    FieldDef {
        key: "PM25_last",
        name: "PM2.5",
        unit: Some(U::MICROGRAMS_PER_CUBIC_METER),
        class: Some(C::Pm25),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    FieldDef {
        key: "PM25_24H",
        name: "PM2.5 24h Average",
        unit: Some(U::MICROGRAMS_PER_CUBIC_METER),
        class: Some(C::Pm25),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    FieldDef {
        key: "PM100_last",
        name: "PM10",
        unit: Some(U::MICROGRAMS_PER_CUBIC_METER),
        class: Some(C::Pm10),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    FieldDef {
        key: "PM100_24H",
        name: "PM10 24h Average",
        unit: Some(U::MICROGRAMS_PER_CUBIC_METER),
        class: Some(C::Pm10),
        transform: Transform::Passthrough,
        diagnostic: false,
    },
    FieldDef {
        key: "ts",
        name: "Last Sample",
        unit: None,
        class: Some(C::Timestamp),
        transform: Transform::EpochTimestamp,
        diagnostic: true,
    },
];

/// The field table for a device variant. `Unknown` exposes nothing.
pub fn fields_for(kind: DeviceKind) -> &'static [FieldDef] {
    match kind {
        DeviceKind::Unknown => &[],
        DeviceKind::FourPro => FOUR_PRO_FIELDS,
        DeviceKind::WeatherDisplay => WEATHER_DISPLAY_FIELDS,
        DeviceKind::Aqm2 => AQM2_FIELDS,
        DeviceKind::Aqm3 => AQM3_FIELDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> Payload {
        let serde_json::Value::Object(map) = v else {
            unreachable!()
        };
        Payload::new(map)
    }

    #[test]
    fn scale_tenth_divides_by_ten() {
        let p = payload(json!({"Tin": 210}));
        assert_eq!(
            Transform::ScaleTenth.apply(&p, "Tin"),
            Some(SensorValue::Number(21.0))
        );
    }

    #[test]
    fn scale_tenth_absent_key_is_none() {
        let p = payload(json!({}));
        assert_eq!(Transform::ScaleTenth.apply(&p, "Tin"), None);
    }

    #[test]
    fn scale_tenth_coerces_comma_before_scaling() {
        // "215,0" → 215.0 → ÷10 → 21.5
        let p = payload(json!({"Tin": "215,0"}));
        assert_eq!(
            Transform::ScaleTenth.apply(&p, "Tin"),
            Some(SensorValue::Number(21.5))
        );

        let p = payload(json!({"Tin": "21,5"}));
        assert_eq!(
            Transform::ScaleTenth.apply(&p, "Tin"),
            Some(SensorValue::Number(2.15))
        );
    }

    #[test]
    fn scale_tenth_unparsable_is_none() {
        let p = payload(json!({"Tin": "offline"}));
        assert_eq!(Transform::ScaleTenth.apply(&p, "Tin"), None);
    }

    #[test]
    fn passthrough_keeps_integers_and_text() {
        let p = payload(json!({"Wdir": 270, "SR": 812.5, "note": "windy"}));
        assert_eq!(
            Transform::Passthrough.apply(&p, "Wdir"),
            Some(SensorValue::Integer(270))
        );
        assert_eq!(
            Transform::Passthrough.apply(&p, "SR"),
            Some(SensorValue::Number(812.5))
        );
        assert_eq!(
            Transform::Passthrough.apply(&p, "note"),
            Some(SensorValue::Text("windy".into()))
        );
    }

    #[test]
    fn passthrough_coerces_numeric_strings() {
        let p = payload(json!({"Wdir": "270", "SR": "81,5"}));
        assert_eq!(
            Transform::Passthrough.apply(&p, "Wdir"),
            Some(SensorValue::Integer(270))
        );
        assert_eq!(
            Transform::Passthrough.apply(&p, "SR"),
            Some(SensorValue::Number(81.5))
        );
    }

    #[test]
    fn coded_enum_maps_known_codes() {
        let p = payload(json!({"AVG_M": 3}));
        assert_eq!(
            Transform::CodedEnum(AVG_MODE_LABELS).apply(&p, "AVG_M"),
            Some(SensorValue::Text("nowcast 12h".into()))
        );
    }

    #[test]
    fn coded_enum_renders_unknown_codes() {
        let p = payload(json!({"AVG_M": 9}));
        assert_eq!(
            Transform::CodedEnum(AVG_MODE_LABELS).apply(&p, "AVG_M"),
            Some(SensorValue::Text("unknown (9)".into()))
        );
    }

    #[test]
    fn epoch_timestamp_converts_to_utc() {
        let p = payload(json!({"ts": 1_700_000_000}));
        match Transform::EpochTimestamp.apply(&p, "ts") {
            Some(SensorValue::Timestamp(ts)) => {
                assert_eq!(ts.timestamp(), 1_700_000_000);
            }
            other => panic!("expected a timestamp, got {other:?}"),
        }
    }

    #[test]
    fn epoch_timestamp_rejects_non_numeric() {
        let p = payload(json!({"ts": "yesterday"}));
        assert_eq!(Transform::EpochTimestamp.apply(&p, "ts"), None);
    }

    #[test]
    fn four_pro_table_is_complete() {
        // The table must stay key-for-key compatible with the firmware.
        let keys: Vec<&str> = FOUR_PRO_FIELDS.iter().map(|f| f.key).collect();
        for expected in [
            "Tin", "Hin", "Tout", "Hout", "P", "Wsp", "Wgs", "Wdir", "Rtd", "Rfr", "SR", "UV",
            "C02", "PM25", "PM100", "AQI", "ES1T", "ES1H", "ES2T", "ES2H", "ES3T", "ES3H",
            "ES4T", "ES4H", "So1T", "So1M", "So2T", "So2M",
        ] {
            assert!(keys.contains(&expected), "missing {expected}");
        }
        assert_eq!(keys.len(), 28);
    }

    #[test]
    fn unknown_kind_exposes_no_fields() {
        assert!(fields_for(DeviceKind::Unknown).is_empty());
    }
}
