use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::subscription::SubscriptionService;

use crate::openapi::ApiDoc;

pub mod subscriptions;

/// Shared handler state; cloned per request.
#[derive(Clone)]
pub struct ServerState {
    pub subscriptions: SubscriptionService,
}

impl ServerState {
    pub fn new(subscriptions: SubscriptionService) -> Self { Self { subscriptions } }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    // Literal segments win over `:id`, so /subs/total and /subs/add stay reachable.
    let subs = Router::new()
        .route("/subs", get(subscriptions::list).post(subscriptions::create))
        .route("/subs/add", post(subscriptions::create))
        .route("/subs/total", post(subscriptions::total))
        .route("/subs/:id", get(subscriptions::get).delete(subscriptions::delete));

    public
        .merge(subs)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
