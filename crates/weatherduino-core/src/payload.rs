// ── Payload wrapper ──
//
// A thin view over the flat JSON object a device reports. The firmware
// family sends most continuous quantities as integers scaled by ten, and
// some builds emit numbers as strings with a decimal comma ("21,5"), so
// numeric access goes through a single coercion path here.

use serde_json::Value;

use weatherduino_api::RawPayload;

/// One device payload snapshot.
///
/// Ephemeral: replaced wholesale on every successful poll, never merged
/// with the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(RawPayload);

impl Payload {
    pub fn new(raw: RawPayload) -> Self {
        Self(raw)
    }

    /// The raw JSON value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// `true` if any of `keys` is present. Drives device classification.
    pub fn contains_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.0.contains_key(*k))
    }

    /// Numeric view of a field, coercing comma-decimal strings.
    pub fn numeric(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(coerce_numeric)
    }

    /// Integer view of a field. Accepts numeric strings; rejects values
    /// with a fractional part.
    pub fn integer(&self, key: &str) -> Option<i64> {
        coerce_integer(self.get(key)?)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<RawPayload> for Payload {
    fn from(raw: RawPayload) -> Self {
        Self::new(raw)
    }
}

/// Coerce a JSON scalar to a float.
///
/// Numbers pass through; strings are trimmed and a decimal comma is
/// replaced with a period before parsing. Anything else is `None`.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Coerce a JSON scalar to an integer, via [`coerce_numeric`].
pub fn coerce_integer(value: &Value) -> Option<i64> {
    if let Value::Number(n) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    let f = coerce_numeric(value)?;
    // i64 can represent every integral f64 in the device's value range.
    #[allow(clippy::cast_possible_truncation)]
    (f.fract() == 0.0 && f.is_finite()).then(|| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: Value) -> Payload {
        let Value::Object(map) = v else {
            unreachable!("test payloads are objects")
        };
        Payload::new(map)
    }

    #[test]
    fn numeric_passes_numbers_through() {
        let p = payload(json!({"Tin": 210, "P": 10132.5}));
        assert_eq!(p.numeric("Tin"), Some(210.0));
        assert_eq!(p.numeric("P"), Some(10132.5));
    }

    #[test]
    fn numeric_coerces_comma_decimal_strings() {
        let p = payload(json!({"Tin": "21,5", "Hout": " 77.5 "}));
        assert_eq!(p.numeric("Tin"), Some(21.5));
        assert_eq!(p.numeric("Hout"), Some(77.5));
    }

    #[test]
    fn numeric_rejects_garbage() {
        let p = payload(json!({"Tin": "n/a", "Hin": null, "ok": true}));
        assert_eq!(p.numeric("Tin"), None);
        assert_eq!(p.numeric("Hin"), None);
        assert_eq!(p.numeric("ok"), None);
        assert_eq!(p.numeric("absent"), None);
    }

    #[test]
    fn integer_rejects_fractional() {
        let p = payload(json!({"AVG_M": 3, "half": 1.5, "text": "4"}));
        assert_eq!(p.integer("AVG_M"), Some(3));
        assert_eq!(p.integer("half"), None);
        assert_eq!(p.integer("text"), Some(4));
    }

    #[test]
    fn contains_any_matches_any_listed_key() {
        let p = payload(json!({"Wdir": 90}));
        assert!(p.contains_any(&["Wsp", "Wgs", "Wdir"]));
        assert!(!p.contains_any(&["PM25AQI", "AVG_M"]));
    }
}
