//! Full startup with the dashboard enabled, then shutdown.

use std::net::TcpListener as StdListener;
use std::time::Duration;

use uptimer::config::{DashboardConfig, EndpointConfig, MonitorConfig};
use uptimer::lifecycle::{self, ProcessClock};

mod common;

fn free_port() -> u16 {
    let listener = StdListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_dashboard_and_api_end_to_end() {
    let backend = common::start_sequenced_backend(vec![200]).await;
    let port = free_port();
    let url = format!("http://{}/ok", backend);

    let config = MonitorConfig {
        interval_secs: 3600,
        endpoints: vec![EndpointConfig {
            url: url.clone(),
            expected_code: "200".into(),
        }],
        dashboard: DashboardConfig { port: Some(port) },
        ..Default::default()
    };

    let running = lifecycle::start(&config, ProcessClock::start()).await.unwrap();

    // Let the first check land and the server bind.
    let client = reqwest::Client::new();
    let api = format!("http://127.0.0.1:{}/api/status", port);
    let mut doc = serde_json::Value::Null;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&api).send().await {
            doc = resp.json().await.unwrap();
            if doc["endpoints"][0]["total_checks"] == 1 {
                break;
            }
        }
    }

    assert_eq!(doc["endpoints"][0]["url"], url.as_str());
    assert_eq!(doc["endpoints"][0]["total_checks"], 1);
    assert_eq!(doc["endpoints"][0]["is_up"], true);

    let again: serde_json::Value = client.get(&api).send().await.unwrap().json().await.unwrap();
    assert_eq!(again["endpoints"][0]["total_checks"], doc["endpoints"][0]["total_checks"]);
    assert_eq!(
        again["endpoints"][0]["successful_checks"],
        doc["endpoints"][0]["successful_checks"]
    );

    let html = client
        .get(format!("http://127.0.0.1:{}/", port))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(&url));
    assert!(html.contains(r#"<td class="up">UP</td>"#));

    let summary = running.stop(false).await;
    assert!(summary.contains("SHUTDOWN SUMMARY"));
    assert!(summary.contains("Checks: 1/1"));
}
