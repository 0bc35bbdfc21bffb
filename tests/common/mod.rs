//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ETAG, SET_COOKIE},
        HeaderMap, HeaderName, Method, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

use api_cors_proxy::{HttpServer, ProxyConfig, ProxySettings, Shutdown};

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A mock upstream that records every request it receives.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests().pop().expect("upstream received no request")
    }
}

/// Start a mock upstream on an ephemeral port.
///
/// - `/users` → `200 [{"id":1}]` as JSON
/// - `/headers` → `200 hello` with headers the proxy must filter or override
/// - `/teapot` → `418`
/// - anything else → `200 ok`
pub async fn start_mock_upstream() -> MockUpstream {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .fallback(upstream_handler)
        .with_state(captured.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, captured }
}

async fn upstream_handler(
    State(captured): State<Arc<Mutex<Vec<CapturedRequest>>>>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts.uri.path().to_string();

    captured.lock().unwrap().push(CapturedRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    });

    match path.as_str() {
        "/users" => ([(CONTENT_TYPE, "application/json")], r#"[{"id":1}]"#).into_response(),
        "/headers" => (
            [
                (CONTENT_TYPE, "text/plain"),
                (ETAG, "\"abc\""),
                (SET_COOKIE, "session=upstream"),
                (ACCESS_CONTROL_ALLOW_ORIGIN, "https://evil.example"),
                (HeaderName::from_static("x-proxy-by"), "upstream"),
                (HeaderName::from_static("x-internal"), "secret"),
            ],
            "hello",
        )
            .into_response(),
        "/teapot" => (StatusCode::IM_A_TEAPOT, "short and stout").into_response(),
        _ => "ok".into_response(),
    }
}

/// Default config pointed at `base_url`.
pub fn proxy_config(base_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = base_url.to_string();
    config
}

/// Start a proxy on an ephemeral port. Trigger the returned `Shutdown` to stop it.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let settings = ProxySettings::from_config(&config).expect("invalid test config");
    let server = HttpServer::new(settings).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
