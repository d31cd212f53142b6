//! HTTP contract tests for the forecast fetcher, the survey pipeline and the
//! notifier, run against a local mock server.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{Australia::Melbourne, Tz};
use good_surf::config::Config;
use good_surf::forecast::{ForecastClient, ForecastError};
use good_surf::message::Outcome;
use good_surf::notify::{Notifier, NotifyError};
use good_surf::survey::{report_message, survey};
use good_surf::{Field, Location};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORECAST_PATH: &str = "/v2/weather/point";

fn now() -> DateTime<Tz> {
    Melbourne.with_ymd_and_hms(2024, 5, 8, 7, 0, 0).unwrap()
}

/// Thursday 9 May: clean from 08:00 to 10:00 local, flat the rest of the day.
fn forecast_body() -> Value {
    let hours: Vec<Value> = (6..19)
        .map(|h| {
            let good = (8..=10).contains(&h);
            let time = Melbourne
                .with_ymd_and_hms(2024, 5, 9, h, 0, 0)
                .unwrap()
                .with_timezone(&Utc);
            json!({
                "time": time.to_rfc3339(),
                "swellHeight": {"noaa": if good { 1.5 } else { 0.4 }},
                "windDirection": {"noaa": 12.0, "sg": 8.0},
                "windSpeed": {"noaa": 5.0}
            })
        })
        .collect();
    json!({"hours": hours, "meta": {"cost": 1}})
}

fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.forecast.url = format!("{}{FORECAST_PATH}", server.uri());
    config.notify.url = format!("{}/1/messages.json", server.uri());
    config
}

#[tokio::test]
async fn fetch_sends_expected_request() {
    let server = MockServer::start().await;
    let location = Location::new("13th Beach", -38.2889164, 144.4708001, 10);

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(header("Authorization", "test-key"))
        .and(query_param("params", Field::query_list()))
        .and(query_param("start", now().timestamp().to_string()))
        .and(query_param("lat", "-38.2889164"))
        .and(query_param("lng", "144.4708001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ForecastClient::new(format!("{}{FORECAST_PATH}", server.uri()), "test-key");
    let samples = client.fetch(&location, now()).await.unwrap();

    assert_eq!(samples.len(), 13);
    assert_eq!(samples[0].time, Melbourne.with_ymd_and_hms(2024, 5, 9, 6, 0, 0).unwrap());
    assert_eq!(samples[0].aggregate(Field::WindDirection).unwrap(), 10.0);
}

#[tokio::test]
async fn error_status_is_not_parsed_as_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(
            ResponseTemplate::new(402)
                .set_body_json(json!({"errors": {"key": "Daily quota exceeded"}})),
        )
        .mount(&server)
        .await;

    let client = ForecastClient::new(format!("{}{FORECAST_PATH}", server.uri()), "test-key");
    let err = client
        .fetch(&Location::new("Sandy", -38.83, 146.118, 33), now())
        .await
        .unwrap_err();

    match err {
        ForecastError::Status { status, body } => {
            assert_eq!(status, 402);
            assert!(body.contains("Daily quota exceeded"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_status_without_body_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ForecastClient::new(format!("{}{FORECAST_PATH}", server.uri()), "test-key");
    let err = client
        .fetch(&Location::new("Sandy", -38.83, 146.118, 33), now())
        .await
        .unwrap_err();

    assert!(
        matches!(&err, ForecastError::Status { status: 503, body } if body.is_empty()),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn failed_location_does_not_stop_the_survey() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("lat", "-38.2889164"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("lat", "-38.83"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ForecastClient::new(&config.forecast.url, "test-key");
    let reports = survey(&config, &client, now()).await;
    assert_eq!(reports.len(), 2);
    assert!(matches!(&reports[0].outcome, Outcome::Windows(w) if w.len() == 1));
    assert!(matches!(&reports[1].outcome, Outcome::Unavailable(reason) if reason.contains("500")));
}

#[tokio::test]
async fn report_message_renders_all_spots() {
    let server = MockServer::start().await;
    let config = config_for(&server);

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = ForecastClient::new(&config.forecast.url, "test-key");
    let message = report_message(&config, &client, now()).await;
    // Both spots see the same clean morning; 10° wind is offshore for each
    assert_eq!(message, "13th Beach:\n1.5m this Thursday\n\nSandy:\n1.5m this Thursday");
}

#[tokio::test]
async fn broadcast_stops_at_first_rejected_device() {
    let server = MockServer::start().await;
    let message = "Sandy:\nNo clean surf conditions :(";

    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .and(query_param("token", "app-token"))
        .and(query_param("user", "user-key"))
        .and(query_param("title", "Clean Surf Conditions"))
        .and(query_param("message", message))
        .and(query_param("device", "iphonexs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .and(query_param("device", "pixel6a"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"status": 0, "errors": ["device invalid"]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .and(query_param("device", "tablet"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = Notifier::new(
        format!("{}/1/messages.json", server.uri()),
        "app-token",
        "user-key",
        "Clean Surf Conditions",
    );
    let devices = vec!["iphonexs".to_string(), "pixel6a".to_string(), "tablet".to_string()];
    let err = notifier.broadcast(&devices, message).await.unwrap_err();

    match err {
        NotifyError::Rejected { device, status, body } => {
            assert_eq!(device, "pixel6a");
            assert_eq!(status, 400);
            assert!(body.contains("device invalid"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn broadcast_counts_delivered_devices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let notifier = Notifier::new(format!("{}/1/messages.json", server.uri()), "t", "u", "Surf");
    let sent = notifier
        .broadcast(&["a".to_string(), "b".to_string()], "hello")
        .await
        .unwrap();
    assert_eq!(sent, 2);
}
