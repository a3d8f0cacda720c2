// Station lifecycle tests against a wiremock device.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weatherduino_core::{
    CoreError, DeviceKind, PollState, SensorSource, SensorValue, Station, StationConfig,
};

fn config_for(server: &MockServer, forced: Option<DeviceKind>) -> StationConfig {
    let addr = server.address();
    StationConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        path: "/json".into(),
        // Long interval: these tests drive refresh() by hand.
        scan_interval: Duration::from_secs(3600),
        forced_kind: forced,
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn start_fixes_entity_set_from_first_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"T": 143, "H": 775, "TID": 7})),
        )
        .mount(&server)
        .await;

    let station = Station::new(config_for(&server, None)).unwrap();
    assert!(matches!(
        station.entities(),
        Err(CoreError::NotStarted)
    ));

    station.start().await.unwrap();

    let snap = station.latest().expect("snapshot after start");
    assert_eq!(snap.kind, DeviceKind::WeatherDisplay);
    // No ID field: display identity falls back to the host.
    assert_eq!(snap.device_id, server.address().ip().to_string());

    let entities = station.entities().unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(
        entities[0].current_value(&snap.payload),
        Some(SensorValue::Number(14.3))
    );
    assert_eq!(
        entities[1].current_value(&snap.payload),
        Some(SensorValue::Number(77.5))
    );

    let info = station.device_info().unwrap();
    assert_eq!(info.model, "WeatherDuino WeatherDisplay");

    station.stop().await;
    assert_eq!(*station.state().borrow(), PollState::Idle);
}

#[tokio::test]
async fn failed_first_fetch_aborts_start() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let station = Station::new(config_for(&server, None)).unwrap();
    let result = station.start().await;

    match result {
        Err(CoreError::Fetch { ref url, .. }) => {
            assert!(url.contains("/json"), "url: {url}");
        }
        other => panic!("expected Fetch error, got {other:?}"),
    }
    assert!(station.latest().is_none());
}

#[tokio::test]
async fn forced_kind_skips_classification() {
    let server = MockServer::start().await;

    // Payload says WeatherDisplay; config insists on AQM2.
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"T": 143, "H": 775})))
        .mount(&server)
        .await;

    let station = Station::new(config_for(&server, Some(DeviceKind::Aqm2))).unwrap();
    station.start().await.unwrap();

    let snap = station.latest().unwrap();
    assert_eq!(snap.kind, DeviceKind::Aqm2);
    // None of the AQM2 keys are present: zero sensors, silently stable.
    assert!(station.entities().unwrap().is_empty());

    station.stop().await;
}

#[tokio::test]
async fn refresh_replaces_the_snapshot_wholesale() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"T": 143, "H": 775, "TID": 7})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let station = Station::new(config_for(&server, None)).unwrap();
    station.start().await.unwrap();

    // Second payload drops H entirely.
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"T": 150, "TID": 7})))
        .mount(&server)
        .await;

    let snap = station.refresh().await.unwrap();
    assert!(!snap.payload.contains("H"), "no merge with previous payload");

    // Entity set is unchanged; the H entity now reads None.
    let entities = station.entities().unwrap();
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[1].current_value(&snap.payload), None);

    station.stop().await;
}
