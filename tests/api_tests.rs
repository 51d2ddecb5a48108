use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use dexarr::config::Config;
use dexarr::state::SharedState;

/// Stand-in for the upstream catalog: serves a canned pikachu payload and
/// counts record fetches so tests can assert how often the network tier ran.
#[derive(Default)]
struct FakeUpstream {
    pokemon_hits: AtomicUsize,
}

async fn fake_pokemon(
    State(fake): State<Arc<FakeUpstream>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    fake.pokemon_hits.fetch_add(1, Ordering::SeqCst);

    if name == "pikachu" {
        Json(serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "sprites": {"front_default": "url1"},
            "abilities": [
                {
                    "is_hidden": false,
                    "slot": 1,
                    "ability": {"name": "static", "url": "https://pokeapi.co/api/v2/ability/9/"}
                }
            ],
            "types": [
                {"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}
            ]
        }))
        .into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn fake_type(Path(id): Path<i64>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "id": id,
        "name": "electric",
        "damage_relations": {
            "double_damage_from": [{"name": "ground", "url": "https://pokeapi.co/api/v2/type/5/"}],
            "double_damage_to": [{"name": "water", "url": "https://pokeapi.co/api/v2/type/11/"}],
            "half_damage_from": [],
            "half_damage_to": [],
            "no_damage_from": [],
            "no_damage_to": []
        }
    }))
}

async fn spawn_fake_upstream() -> (String, Arc<FakeUpstream>) {
    let fake = Arc::new(FakeUpstream::default());

    let app = Router::new()
        .route("/pokemon/{name}", get(fake_pokemon))
        .route("/type/{id}", get(fake_type))
        .with_state(Arc::clone(&fake));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), fake)
}

async fn spawn_app(upstream_base: &str, cache_ttl_seconds: u64) -> Router {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.upstream.base_url = upstream_base.to_string();
    config.cache.ttl_seconds = cache_ttl_seconds;

    let state = Arc::new(
        SharedState::new(config)
            .await
            .expect("Failed to create app state"),
    );
    dexarr::api::router(state)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn missing_name_is_a_client_error() {
    let (base, fake) = spawn_fake_upstream().await;
    let app = spawn_app(&base, 300).await;

    let (status, body) = get_json(&app, "/api/pokemon").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(fake.pokemon_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_name_is_a_client_error() {
    let (base, fake) = spawn_fake_upstream().await;
    let app = spawn_app(&base, 300).await;

    let (status, _) = get_json(&app, "/api/pokemon?name=%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fake.pokemon_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_name_everywhere_is_not_found() {
    let (base, fake) = spawn_fake_upstream().await;
    let app = spawn_app(&base, 300).await;

    let (status, body) = get_json(&app, "/api/pokemon?name=missingno").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(fake.pokemon_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn resolves_pikachu_end_to_end() {
    let (base, fake) = spawn_fake_upstream().await;
    let app = spawn_app(&base, 300).await;

    let (status, body) = get_json(&app, "/api/pokemon?name=pikachu").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(
        body["data"],
        serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "sprite": "url1",
            "abilities": ["static"],
            "types": ["electric"]
        })
    );
    assert_eq!(fake.pokemon_hits.load(Ordering::SeqCst), 1);

    // Second request within the TTL is served from cache: the upstream
    // counter must not move and the payload is identical.
    let (status, again) = get_json(&app, "/api/pokemon?name=pikachu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["data"], body["data"]);
    assert_eq!(fake.pokemon_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn store_tier_answers_when_cache_has_expired() {
    let (base, fake) = spawn_fake_upstream().await;
    // TTL of zero expires entries immediately, forcing every request past
    // the cache tier.
    let app = spawn_app(&base, 0).await;

    let (status, first) = get_json(&app, "/api/pokemon?name=pikachu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fake.pokemon_hits.load(Ordering::SeqCst), 1);

    let (status, second) = get_json(&app, "/api/pokemon?name=pikachu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"], first["data"]);
    // Durably known: the repeat lookup never paid network latency.
    assert_eq!(fake.pokemon_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn health_endpoint_reports_database_status() {
    let (base, _fake) = spawn_fake_upstream().await;
    let app = spawn_app(&base, 300).await;

    let (status, body) = get_json(&app, "/api/system/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], serde_json::json!("ok"));
    assert_eq!(body["data"]["database"], serde_json::json!("ok"));
}
