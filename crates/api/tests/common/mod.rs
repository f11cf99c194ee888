#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tokio::sync::mpsc;
use tower::ServiceExt;

use postforge_api::cache::CampaignCache;
use postforge_api::config::{LogFormat, ServerConfig, WEBHOOK_URL_VAR};
use postforge_api::router::build_app_router;
use postforge_api::state::{AppState, Clock};
use postforge_db::models::character::{CreateCharacter, CreateCharacterAsset};
use postforge_db::models::persona::CreatePersona;
use postforge_db::repositories::{CharacterRepo, PersonaRepo};
use postforge_events::{CampaignNotifier, DisabledNotifier, WebhookNotifier};

/// Build a test `ServerConfig` with safe defaults and no webhook.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: String::new(),
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        view_cache_ttl_secs: 3600,
        view_cache_capacity: std::num::NonZeroUsize::new(64).unwrap(),
        webhook_url: None,
        log_format: LogFormat::Text,
    }
}

fn build_with(
    pool: PgPool,
    config: ServerConfig,
    notifier: Arc<dyn CampaignNotifier>,
    clock: Clock,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cache: Arc::new(CampaignCache::new(
            config.view_cache_capacity,
            Duration::from_secs(config.view_cache_ttl_secs),
        )),
        notifier,
        clock,
    };
    build_app_router(state, &config)
}

/// Full application router with notifications disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_clock(pool, Clock::system())
}

/// Full application router with notifications disabled and a custom date
/// source.
pub fn build_test_app_with_clock(pool: PgPool, clock: Clock) -> Router {
    build_with(
        pool,
        test_config(),
        Arc::new(DisabledNotifier::new(WEBHOOK_URL_VAR)),
        clock,
    )
}

/// Full application router posting campaign events to `url`.
pub fn build_test_app_with_webhook(pool: PgPool, url: &str) -> Router {
    let mut config = test_config();
    config.webhook_url = Some(url.to_string());
    let notifier = WebhookNotifier::with_timeout(url, Duration::from_secs(2)).unwrap();
    build_with(pool, config, Arc::new(notifier), Clock::system())
}

// ---------------------------------------------------------------------------
// Webhook receiver
// ---------------------------------------------------------------------------

/// Start a local webhook receiver that answers every POST with `status` and
/// forwards the JSON body it received. Returns the receiver URL.
pub async fn spawn_webhook(status: StatusCode) -> (String, mpsc::UnboundedReceiver<Value>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/hook",
        axum::routing::post(move |axum::Json(body): axum::Json<Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(body);
                status
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/hook"), rx)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post(app: Router, uri: &str) -> Response {
    send(app, Request::post(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    post_json_with_headers(app, uri, body, &[]).await
}

pub async fn post_json_with_headers(
    app: Router,
    uri: &str,
    body: Value,
    headers: &[(&str, &str)],
) -> Response {
    let mut builder = Request::post(uri).header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_persona(pool: &PgPool, key: &str, label: &str) {
    PersonaRepo::create(
        pool,
        &CreatePersona {
            key: key.to_string(),
            label: label.to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
}

/// Seed a character under the catalogue id `id`. Returns the id.
pub async fn seed_character(pool: &PgPool, id: &str, name: &str) -> String {
    CharacterRepo::create(
        pool,
        &CreateCharacter {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_asset(pool: &PgPool, character_id: &str, url: &str, is_primary: bool) -> i64 {
    CharacterRepo::add_asset(
        pool,
        character_id,
        &CreateCharacterAsset {
            storage_url: url.to_string(),
            is_primary,
        },
    )
    .await
    .unwrap()
    .id
}

/// A valid image campaign submission referencing one persona and one character.
pub fn launch_submission(persona: &str, character_id: &str) -> Value {
    json!({
        "title": "Launch",
        "objective": "Grow followers",
        "postLength": "short",
        "cadence": { "daysOfWeek": ["monday", "wednesday"], "frequency": "weekly" },
        "postType": "image",
        "personas": [persona],
        "characters": [character_id]
    })
}

/// Seed the default fixtures and create one campaign. Returns its id.
pub async fn create_launch_campaign(pool: &PgPool) -> i64 {
    seed_persona(pool, "p1", "Founder").await;
    seed_character(pool, "c1", "Alpha").await;
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/campaigns", launch_submission("p1", "c1")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["campaign_id"]
        .as_i64()
        .unwrap()
}
