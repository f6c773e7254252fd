use axum::{extract::State, routing::get, Json, Router};
use libris_cache::CacheClient;
use serde_json::{json, Value};

#[derive(Clone)]
struct HealthState {
    service: String,
    cache: CacheClient,
}

/// `GET /health`, reporting the service name and whether the cache is in use
pub fn routes(service: impl Into<String>, cache: CacheClient) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(HealthState {
            service: service.into(),
            cache,
        })
}

async fn health(State(state): State<HealthState>) -> Json<Value> {
    let cache = if state.cache.is_available() {
        "available"
    } else {
        "unavailable"
    };

    Json(json!({
        "status": "healthy",
        "service": state.service,
        "cache": cache,
    }))
}
