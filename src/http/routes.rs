use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Recording control
        .route("/call/record/start", post(handlers::start_recording))
        .route("/call/record/stop", post(handlers::stop_recording))
        .route("/call/status", get(handlers::get_status))
        // History and analytics
        .route("/history", get(handlers::get_history))
        .route("/analytics", get(handlers::get_analytics))
        .route("/summaries", get(handlers::get_summaries))
        // Post-call summary
        .route("/call/summary", post(handlers::generate_summary))
        // CRM passthrough
        .route("/customers/lookup", get(handlers::lookup_customer))
        .route(
            "/customers/recommendations",
            get(handlers::get_recommendations),
        )
        // Request logging + permissive CORS for the dashboard
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
