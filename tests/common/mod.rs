// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: a fake Spotify server and app builders.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use now_playing_proxy::config::{Config, SpotifyCredentialsConfig};
use now_playing_proxy::routes::create_router;
use now_playing_proxy::AppState;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Canned upstream responses.
#[derive(Clone)]
pub struct FakeBehavior {
    pub token_status: u16,
    pub token_body: String,
    pub token_delay: Duration,
    pub playback_status: u16,
    pub playback_body: String,
    pub playback_delay: Duration,
}

impl Default for FakeBehavior {
    fn default() -> Self {
        Self {
            token_status: 200,
            token_body: token_body("fake_access_token", 3600),
            token_delay: Duration::ZERO,
            playback_status: 204,
            playback_body: String::new(),
            playback_delay: Duration::ZERO,
        }
    }
}

impl FakeBehavior {
    pub fn playing(body: serde_json::Value) -> Self {
        Self {
            playback_status: 200,
            playback_body: body.to_string(),
            ..Self::default()
        }
    }
}

#[allow(dead_code)]
pub fn token_body(access_token: &str, expires_in: i64) -> String {
    serde_json::json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": expires_in,
        "scope": "user-read-currently-playing user-read-playback-state"
    })
    .to_string()
}

#[derive(Default)]
struct Recorded {
    token_auth: Option<String>,
    token_form: Option<String>,
    playback_auth: Option<String>,
}

struct FakeState {
    behavior: Mutex<FakeBehavior>,
    token_hits: AtomicUsize,
    playback_hits: AtomicUsize,
    recorded: Mutex<Recorded>,
}

/// A local stand-in for the Spotify accounts service and Web API.
pub struct FakeSpotify {
    pub addr: SocketAddr,
    state: Arc<FakeState>,
}

#[allow(dead_code)]
impl FakeSpotify {
    pub async fn start(behavior: FakeBehavior) -> Self {
        let state = Arc::new(FakeState {
            behavior: Mutex::new(behavior),
            token_hits: AtomicUsize::new(0),
            playback_hits: AtomicUsize::new(0),
            recorded: Mutex::new(Recorded::default()),
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me/player/currently-playing", get(currently_playing))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake spotify");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Config pointing at this fake with the default test credentials.
    pub fn config(&self) -> Config {
        Config {
            spotify_accounts_url: format!("http://{}", self.addr),
            spotify_api_url: format!("http://{}/v1", self.addr),
            upstream_timeout: Duration::from_millis(500),
            ..Config::test_default()
        }
    }

    pub fn set_behavior(&self, behavior: FakeBehavior) {
        *self.state.behavior.lock().unwrap() = behavior;
    }

    pub fn token_hits(&self) -> usize {
        self.state.token_hits.load(Ordering::SeqCst)
    }

    pub fn playback_hits(&self) -> usize {
        self.state.playback_hits.load(Ordering::SeqCst)
    }

    pub fn token_auth(&self) -> Option<String> {
        self.state.recorded.lock().unwrap().token_auth.clone()
    }

    pub fn token_form(&self) -> Option<String> {
        self.state.recorded.lock().unwrap().token_form.clone()
    }

    pub fn playback_auth(&self) -> Option<String> {
        self.state.recorded.lock().unwrap().playback_auth.clone()
    }
}

fn auth_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn canned(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn token(State(state): State<Arc<FakeState>>, headers: HeaderMap, body: String) -> Response {
    state.token_hits.fetch_add(1, Ordering::SeqCst);
    {
        let mut recorded = state.recorded.lock().unwrap();
        recorded.token_auth = auth_header(&headers);
        recorded.token_form = Some(body);
    }
    let behavior = state.behavior.lock().unwrap().clone();
    tokio::time::sleep(behavior.token_delay).await;
    canned(behavior.token_status, behavior.token_body)
}

async fn currently_playing(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.playback_hits.fetch_add(1, Ordering::SeqCst);
    state.recorded.lock().unwrap().playback_auth = auth_header(&headers);
    let behavior = state.behavior.lock().unwrap().clone();
    tokio::time::sleep(behavior.playback_delay).await;
    canned(behavior.playback_status, behavior.playback_body)
}

/// Create a test app from the given config.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_config(config).expect("build app state"));
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn credentials(
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> SpotifyCredentialsConfig {
    SpotifyCredentialsConfig::new(
        Some(client_id.to_string()),
        Some(client_secret.to_string()),
        Some(refresh_token.to_string()),
    )
}

/// Send a request and return status, headers, and parsed JSON body.
#[allow(dead_code)]
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
