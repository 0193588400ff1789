use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Speech pipeline
        .route("/transcribe", post(handlers::transcribe))
        .route("/generate-response", post(handlers::generate_response))
        .route("/text-to-speech", post(handlers::text_to_speech))
        // Conversation control
        .route("/reset-conversation", delete(handlers::reset_conversation))
        .layer(
            ServiceBuilder::new()
                // Request logging
                .layer(TraceLayer::new_for_http())
                // Browser clients call from any origin
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}
