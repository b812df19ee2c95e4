use httpmock::prelude::*;
use saffron_advisor::core::TelemetrySource;
use saffron_advisor::domain::model::Reading;
use saffron_advisor::{AdvisorError, TelemetryConfig, ThingSpeakSource};
use serde_json::json;

fn telemetry_config(server: &MockServer) -> TelemetryConfig {
    TelemetryConfig {
        base_url: server.base_url(),
        channel_id: "724299".to_string(),
        read_api_key: "TESTKEY".to_string(),
        timeout_seconds: Some(5),
        ..TelemetryConfig::default()
    }
}

#[tokio::test]
async fn test_fetches_latest_entry_from_channel() {
    let server = MockServer::start_async().await;
    let feed_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/channels/724299/feeds.json")
                .query_param("api_key", "TESTKEY")
                .query_param("results", "1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "channel": {"id": 724299, "name": "Saffron field"},
                    "feeds": [{
                        "created_at": "2025-10-15T05:40:12Z",
                        "entry_id": 1532,
                        "field1": "38",
                        "field2": "24",
                        "field3": "171",
                        "field4": "13"
                    }]
                }));
        })
        .await;

    let source = ThingSpeakSource::new(telemetry_config(&server)).unwrap();
    let reading = source.latest_reading().await.unwrap();

    feed_mock.assert_async().await;
    assert_eq!(
        reading,
        Reading {
            nitrogen: 38,
            phosphorus: 24,
            potassium: 171,
            soil_moisture: 13,
        }
    );
}

#[tokio::test]
async fn test_upstream_error_status_is_unavailable() {
    let server = MockServer::start_async().await;
    let feed_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/channels/724299/feeds.json");
            then.status(500);
        })
        .await;

    let source = ThingSpeakSource::new(telemetry_config(&server)).unwrap();
    let err = source.latest_reading().await.unwrap_err();

    // a failed fetch is not retried
    feed_mock.assert_hits_async(1).await;
    assert!(matches!(err, AdvisorError::TelemetrySourceUnavailable { .. }));
}

#[tokio::test]
async fn test_non_json_body_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/channels/724299/feeds.json");
            then.status(200).body("<html>Service Unavailable</html>");
        })
        .await;

    let source = ThingSpeakSource::new(telemetry_config(&server)).unwrap();
    let err = source.latest_reading().await.unwrap_err();
    assert!(matches!(err, AdvisorError::TelemetrySourceUnavailable { .. }));
}

#[tokio::test]
async fn test_missing_field_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/channels/724299/feeds.json");
            then.status(200).json_body(json!({
                "feeds": [{"field1": "38", "field2": "24", "field3": "171"}]
            }));
        })
        .await;

    let source = ThingSpeakSource::new(telemetry_config(&server)).unwrap();
    let err = source.latest_reading().await.unwrap_err();
    assert!(matches!(err, AdvisorError::MalformedFeedData { .. }));
}

#[tokio::test]
async fn test_empty_channel_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/channels/724299/feeds.json");
            then.status(200).json_body(json!({"channel": {}, "feeds": []}));
        })
        .await;

    let source = ThingSpeakSource::new(telemetry_config(&server)).unwrap();
    let err = source.latest_reading().await.unwrap_err();
    assert!(matches!(err, AdvisorError::MalformedFeedData { .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_unavailable() {
    let config = TelemetryConfig {
        // port 9 (discard) is not expected to accept HTTP connections
        base_url: "http://127.0.0.1:9".to_string(),
        channel_id: "724299".to_string(),
        timeout_seconds: Some(2),
        ..TelemetryConfig::default()
    };

    let source = ThingSpeakSource::new(config).unwrap();
    let err = source.latest_reading().await.unwrap_err();
    assert!(matches!(err, AdvisorError::TelemetrySourceUnavailable { .. }));
}
