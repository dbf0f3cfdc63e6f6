//! End-to-end pipeline test: paginated fetch through photo persistence
//! against a single mock server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use housepix::{Config, ImageReport, RetryConfig, RetryingClient, fetch_houses, process_images};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryConfig {
    RetryConfig {
        initial_interval: Duration::from_millis(5),
        max_interval: Duration::from_millis(20),
        max_elapsed: Duration::from_millis(100),
        multiplier: 2.0,
        jitter: false,
    }
}

fn page_body(server_uri: &str, id: u64, address: &str) -> String {
    format!(
        r#"{{"houses": [{{"id": {id}, "address": "{address}", "homeowner": "John Doe", "price": 100000, "photoURL": "{server_uri}/photos/{id}.jpg"}}], "ok": true}}"#
    )
}

#[tokio::test]
async fn fetches_pages_and_saves_all_photos() {
    let server = MockServer::start().await;

    for (page, id, address) in [(1u32, 1u64, "123 Main St"), (2, 2, "456 Oak St, Apt 3.")] {
        Mock::given(method("GET"))
            .and(path("/houses"))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&server.uri(), id, address)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/photos/{id}.jpg")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("photo-{id}").into_bytes()))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let config = Config {
        base_url: server.uri(),
        total_pages: 2,
        per_page: 1,
        download_dir: dir.path().to_path_buf(),
        image_workers: 2,
        retry: fast_retry(),
        ..Config::default()
    };

    let client = RetryingClient::with_transport(
        housepix::build_http_client().unwrap(),
        config.retry.clone(),
    );

    let outcome = fetch_houses(&client, &config).await.unwrap();
    assert!(outcome.failed_pages.is_empty());
    let mut ids: Vec<u64> = outcome.houses.iter().map(|h| h.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);

    let report = process_images(&client, &outcome.houses, &config).await.unwrap();
    assert_eq!(report, ImageReport { saved: 2, failed: 0 });

    assert_eq!(
        std::fs::read(dir.path().join("1-123_Main_St.jpg")).unwrap(),
        b"photo-1"
    );
    assert_eq!(
        std::fs::read(dir.path().join("2-456_Oak_St_Apt_3.jpg")).unwrap(),
        b"photo-2"
    );
}

#[tokio::test]
async fn transient_503_on_a_page_is_retried_through_to_success() {
    let server = MockServer::start().await;

    // First attempt against the page answers 503; the retry succeeds
    Mock::given(method("GET"))
        .and(path("/houses"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/houses"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&server.uri(), 7, "9 Elm St")))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config {
        base_url: server.uri(),
        total_pages: 1,
        per_page: 1,
        retry: fast_retry(),
        ..Config::default()
    };
    let client = RetryingClient::with_transport(
        housepix::build_http_client().unwrap(),
        config.retry.clone(),
    );

    let outcome = fetch_houses(&client, &config).await.unwrap();
    assert!(outcome.failed_pages.is_empty());
    assert_eq!(outcome.houses.len(), 1);
    assert_eq!(outcome.houses[0].id, 7);
}

#[tokio::test]
async fn exhausted_page_is_reported_while_other_pages_survive() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/houses"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body(&server.uri(), 1, "123 Main St")))
        .mount(&server)
        .await;
    // Page 2 never recovers
    Mock::given(method("GET"))
        .and(path("/houses"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = Config {
        base_url: server.uri(),
        total_pages: 2,
        per_page: 1,
        retry: fast_retry(),
        ..Config::default()
    };
    let client = RetryingClient::with_transport(
        housepix::build_http_client().unwrap(),
        config.retry.clone(),
    );

    let outcome = fetch_houses(&client, &config).await.unwrap();
    assert_eq!(outcome.houses.len(), 1);
    assert_eq!(outcome.failed_pages.len(), 1);
    assert_eq!(outcome.failed_pages[0].page, 2);
    assert!(matches!(
        outcome.failed_pages[0].error,
        housepix::Error::RetryExhausted { .. }
    ));
}
