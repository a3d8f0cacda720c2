// ── Device classification ──
//
// The WeatherDuino family shares one transport and JSON shape but each
// model reports a different field set. Classification sniffs the key set
// of each payload instead of asking the user for a model number. The
// rule order below is load-bearing: a payload carrying both 4Pro-style
// and AQM3-style keys is always a 4Pro. That priority matches the
// shipped firmware and must not be reordered.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::payload::Payload;

/// A physical device variant, inferred per payload (or forced by config).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum DeviceKind {
    /// Payload matched no known shape. Yields zero sensors; not an error.
    #[strum(serialize = "unknown")]
    #[serde(rename = "unknown")]
    Unknown,

    /// WeatherDuino 4Pro receiver: full weather station, optional extra
    /// and soil sensors.
    #[strum(serialize = "4pro")]
    #[serde(rename = "4pro")]
    FourPro,

    /// WeatherDisplay: a bare transmitter relay reporting T/H only.
    #[strum(serialize = "weatherdisplay")]
    #[serde(rename = "weatherdisplay")]
    WeatherDisplay,

    /// Air quality monitor, second generation (AQI + averaging mode).
    #[strum(serialize = "aqm2")]
    #[serde(rename = "aqm2")]
    Aqm2,

    /// Air quality monitor, third generation (raw concentrations + epoch).
    #[strum(serialize = "aqm3")]
    #[serde(rename = "aqm3")]
    Aqm3,
}

impl DeviceKind {
    /// Display model string for the device registry record.
    pub fn model(self) -> &'static str {
        match self {
            Self::Unknown => "WeatherDuino (Local JSON)",
            Self::FourPro => "WeatherDuino 4Pro",
            Self::WeatherDisplay => "WeatherDuino WeatherDisplay",
            Self::Aqm2 => "WeatherDuino AQM 2",
            Self::Aqm3 => "WeatherDuino AQM 3",
        }
    }
}

/// Keys exclusive to the 4Pro receiver (wind and rain instrumentation).
pub const FOUR_PRO_KEYS: &[&str] = &["Wsp", "Wgs", "Wdir", "Rtd", "Rfr"];

/// Keys exclusive to the AQM3.
pub const AQM3_KEYS: &[&str] = &["PM25_last", "PM25_24H", "ts"];

/// Keys exclusive to the AQM2.
pub const AQM2_KEYS: &[&str] = &["PM25AQI", "PM100AQI", "AVG_M"];

/// Infer the device variant from a payload's key set.
///
/// First match wins; recomputed from scratch on every successful poll.
/// `T`+`H` alone is deliberately the last resort -- almost every model
/// reports a temperature somewhere, so the specific shapes go first.
pub fn classify(payload: &Payload) -> DeviceKind {
    if payload.contains_any(FOUR_PRO_KEYS) {
        DeviceKind::FourPro
    } else if payload.contains_any(AQM3_KEYS) {
        DeviceKind::Aqm3
    } else if payload.contains_any(AQM2_KEYS) {
        DeviceKind::Aqm2
    } else if payload.contains("T") && payload.contains("H") {
        DeviceKind::WeatherDisplay
    } else {
        DeviceKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> Payload {
        let serde_json::Value::Object(map) = v else {
            unreachable!()
        };
        Payload::new(map)
    }

    #[test]
    fn any_four_pro_key_wins() {
        for key in FOUR_PRO_KEYS {
            let p = payload(json!({ (*key): 10 }));
            assert_eq!(classify(&p), DeviceKind::FourPro, "key {key}");
        }
    }

    #[test]
    fn four_pro_outranks_aqm3_on_mixed_payloads() {
        // Priority policy, not validation: 4pro > aqm3 > aqm2 > weatherdisplay.
        let p = payload(json!({"Wsp": 32, "PM25_last": 8, "ts": 1700000000}));
        assert_eq!(classify(&p), DeviceKind::FourPro);
    }

    #[test]
    fn aqm3_outranks_aqm2() {
        let p = payload(json!({"ts": 1700000000, "PM25AQI": 42}));
        assert_eq!(classify(&p), DeviceKind::Aqm3);
    }

    #[test]
    fn aqm2_keys_classify_aqm2() {
        let p = payload(json!({"PM25AQI": 42, "PM100AQI": 30, "AVG_M": 1}));
        assert_eq!(classify(&p), DeviceKind::Aqm2);
    }

    #[test]
    fn t_and_h_fall_through_to_weatherdisplay() {
        let p = payload(json!({"T": 143, "H": 775, "TID": 7}));
        assert_eq!(classify(&p), DeviceKind::WeatherDisplay);
    }

    #[test]
    fn t_without_h_is_unknown() {
        let p = payload(json!({"T": 143}));
        assert_eq!(classify(&p), DeviceKind::Unknown);
    }

    #[test]
    fn receiver_only_keys_are_unknown() {
        // Tin/Hin alone do not trigger any rule.
        let p = payload(json!({"ID": "RX1", "Tin": 210, "Hin": 550}));
        assert_eq!(classify(&p), DeviceKind::Unknown);
    }

    #[test]
    fn kind_round_trips_through_strings() {
        use std::str::FromStr;
        for kind in [
            DeviceKind::Unknown,
            DeviceKind::FourPro,
            DeviceKind::WeatherDisplay,
            DeviceKind::Aqm2,
            DeviceKind::Aqm3,
        ] {
            assert_eq!(DeviceKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }
}
