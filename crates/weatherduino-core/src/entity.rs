// ── Sensor entities ──
//
// Entities are instantiated once, from the first payload snapshot: one
// per field-table row whose key is actually present. Fields that only
// appear in later polls are NOT picked up without a reload -- that is
// observable behavior consumers depend on, so it stays.

use crate::classify::DeviceKind;
use crate::fields::{FieldDef, SensorClass, SensorValue, fields_for};
use crate::payload::Payload;

/// Display metadata for one sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorMetadata {
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub class: Option<SensorClass>,
    pub diagnostic: bool,
}

/// Capability exposed by anything that can produce a sensor reading.
///
/// Values are resolved lazily: the entity holds no reading of its own,
/// it re-applies its transform to whatever payload the caller hands in.
pub trait SensorSource {
    fn current_value(&self, payload: &Payload) -> Option<SensorValue>;
    fn metadata(&self) -> SensorMetadata;
}

/// One exposed sensor, bound to a field definition and a device variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorEntity {
    unique_id: String,
    def: &'static FieldDef,
    kind: DeviceKind,
}

impl SensorEntity {
    /// Stable identity: survives restarts as long as the entry id and
    /// field key are unchanged.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// The raw payload key this sensor reads.
    pub fn key(&self) -> &'static str {
        self.def.key
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn def(&self) -> &'static FieldDef {
        self.def
    }
}

impl SensorSource for SensorEntity {
    fn current_value(&self, payload: &Payload) -> Option<SensorValue> {
        self.def.transform.apply(payload, self.def.key)
    }

    fn metadata(&self) -> SensorMetadata {
        SensorMetadata {
            name: self.def.name,
            unit: self.def.unit,
            class: self.def.class,
            diagnostic: self.def.diagnostic,
        }
    }
}

/// Build the fixed entity set for a classified device.
///
/// `entry_id` is the stable configuration-entry identifier. When the
/// first payload carries a numeric `TID` (multiple transmitters of the
/// same type sharing one receiver), it is appended to every unique id so
/// two transmitters never collide.
pub fn build_entities(entry_id: &str, kind: DeviceKind, first: &Payload) -> Vec<SensorEntity> {
    let tid = first.integer("TID");

    fields_for(kind)
        .iter()
        .filter(|def| first.contains(def.key))
        .map(|def| {
            let unique_id = match tid {
                Some(tid) => format!("{entry_id}_{}_{tid}", def.key),
                None => format!("{entry_id}_{}", def.key),
            };
            SensorEntity {
                unique_id,
                def,
                kind,
            }
        })
        .collect()
}

/// Device-registry record for display purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    /// The configuration-entry identifier.
    pub identifier: String,
    /// Device-reported name (payload `ID`, or the configured host).
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
    /// The device's own web UI.
    pub configuration_url: String,
}

impl DeviceInfo {
    pub fn new(entry_id: &str, device_id: &str, kind: DeviceKind, base_url: &str) -> Self {
        Self {
            identifier: entry_id.to_owned(),
            name: device_id.to_owned(),
            manufacturer: "WeatherDuino",
            model: kind.model(),
            configuration_url: base_url.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> Payload {
        let serde_json::Value::Object(map) = v else {
            unreachable!()
        };
        Payload::new(map)
    }

    #[test]
    fn builds_one_entity_per_present_field() {
        // Receiver reporting inside climate plus wind; soil absent.
        let p = payload(json!({"Tin": 210, "Hin": 550, "Wsp": 32}));
        let entities = build_entities("entry1", DeviceKind::FourPro, &p);

        let keys: Vec<&str> = entities.iter().map(SensorEntity::key).collect();
        assert_eq!(keys, vec!["Tin", "Hin", "Wsp"]);
        assert_eq!(entities[0].unique_id(), "entry1_Tin");
    }

    #[test]
    fn weatherdisplay_end_to_end() {
        let p = payload(json!({"T": 143, "H": 775, "TID": 7}));
        let kind = classify(&p);
        assert_eq!(kind, DeviceKind::WeatherDisplay);

        let entities = build_entities("entry1", kind, &p);
        assert_eq!(entities.len(), 2);

        // TID feeds identity, not a sensor.
        assert_eq!(entities[0].unique_id(), "entry1_T_7");
        assert_eq!(entities[1].unique_id(), "entry1_H_7");

        assert_eq!(
            entities[0].current_value(&p),
            Some(SensorValue::Number(14.3))
        );
        assert_eq!(
            entities[1].current_value(&p),
            Some(SensorValue::Number(77.5))
        );
    }

    #[test]
    fn unknown_payload_builds_nothing() {
        // Tin/Hin without any 4Pro-exclusive key never matches a rule.
        let p = payload(json!({"ID": "RX1", "Tin": 210, "Hin": 550}));
        let kind = classify(&p);
        assert_eq!(kind, DeviceKind::Unknown);
        assert!(build_entities("entry1", kind, &p).is_empty());
    }

    #[test]
    fn values_track_the_latest_payload() {
        let first = payload(json!({"T": 143, "H": 775}));
        let entities = build_entities("e", DeviceKind::WeatherDisplay, &first);

        // Same entity set, fresh payload: values follow the snapshot.
        let later = payload(json!({"T": 150, "H": 700}));
        assert_eq!(
            entities[0].current_value(&later),
            Some(SensorValue::Number(15.0))
        );

        // Key missing from a later payload: value is None, entity remains.
        let sparse = payload(json!({"H": 700}));
        assert_eq!(entities[0].current_value(&sparse), None);
    }

    #[test]
    fn entity_set_is_fixed_by_first_snapshot() {
        let first = payload(json!({"Tin": 210, "Wdir": 90}));
        let entities = build_entities("e", DeviceKind::FourPro, &first);
        assert_eq!(entities.len(), 2);

        // Fields appearing later are not picked up -- the set came from
        // the first snapshot and only a rebuild changes it.
        let later = payload(json!({"Tin": 210, "Wdir": 90, "So1T": 155}));
        assert!(entities.iter().all(|e| e.key() != "So1T"));
        assert_eq!(
            build_entities("e", DeviceKind::FourPro, &later).len(),
            3,
            "a rebuild would see the new field"
        );
    }

    #[test]
    fn metadata_mirrors_the_field_table() {
        let p = payload(json!({"AVG_M": 1, "PM25AQI": 42}));
        let entities = build_entities("e", DeviceKind::Aqm2, &p);

        let avg = entities
            .iter()
            .find(|e| e.key() == "AVG_M")
            .expect("AVG_M entity");
        let meta = avg.metadata();
        assert_eq!(meta.name, "Averaging Mode");
        assert!(meta.diagnostic);
        assert_eq!(meta.unit, None);
    }

    #[test]
    fn device_info_uses_kind_model() {
        let info = DeviceInfo::new("entry1", "RX1", DeviceKind::FourPro, "http://192.168.1.50");
        assert_eq!(info.model, "WeatherDuino 4Pro");
        assert_eq!(info.name, "RX1");
        assert_eq!(info.configuration_url, "http://192.168.1.50");
    }
}
