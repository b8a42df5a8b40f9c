//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use scenario_relay::config::RelayConfig;
use scenario_relay::{HttpServer, RelayService, Shutdown};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OK_RESULT_BODY: &str = r#"{"scenario":"ok","value":"here you have a value"}"#;

/// Relay configuration pointed at `base_url`, with short, jitter-free backoff.
pub fn test_config(base_url: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.remote.base_url = base_url.into();
    config.remote.accept_invalid_certs = false;
    config.remote.request_timeout_ms = 3000;
    config.retries.base_delay_ms = 20;
    config.retries.max_delay_ms = 200;
    config.retries.jitter_ratio = 0.0;
    config
}

#[allow(dead_code)]
pub fn relay_for(server: &MockServer) -> RelayService {
    RelayService::from_config(&test_config(&server.uri())).unwrap()
}

/// Stub `GET path` to answer `status` with an optional JSON body.
pub async fn stub(server: &MockServer, at: &str, status: u16, body: Option<&str>) {
    let mut response = ResponseTemplate::new(status);
    if let Some(body) = body {
        response = response.set_body_raw(body.as_bytes().to_vec(), "application/json");
    }
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Stub `GET path` to answer `status` for the first `times` requests only.
/// Takes precedence over stubs mounted with [`stub`].
pub async fn stub_first(server: &MockServer, at: &str, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(times)
        .with_priority(1)
        .mount(server)
        .await;
}

/// Number of requests the stub received for `at`.
pub async fn requests_to(server: &MockServer, at: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == at)
        .count()
}

/// Poll `relay` until no call is outstanding, for at most `limit`.
#[allow(dead_code)]
pub async fn wait_until_idle(relay: &RelayService, limit: Duration) {
    let deadline = tokio::time::Instant::now() + limit;
    while relay.in_flight() != 0 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "relay still has {} call(s) in flight",
            relay.in_flight()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Start the full HTTP relay on an ephemeral port.
#[allow(dead_code)]
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, RelayService, Shutdown) {
    let relay = RelayService::from_config(&config).unwrap();
    let listener = tokio::net::TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, relay.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, relay, shutdown)
}
