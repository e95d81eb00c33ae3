pub mod health;
pub mod interview;

use crate::AppState;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/generate-question", post(interview::generate_question))
        .route("/api/feedback", post(interview::feedback))
        .route("/api/generate-mcq", post(interview::generate_mcq))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
