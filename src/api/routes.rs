use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::api::handlers::{self, AppState};
use crate::store::HybridStore;

pub fn create_router<S: HybridStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Uploaded working sets (ephemeral)
        .route("/sessions", post(handlers::create_session::<S>))
        .route("/sessions/:session_id", delete(handlers::delete_session::<S>))
        .route("/sessions/:session_id/view", get(handlers::get_session_view::<S>))
        .route("/sessions/:session_id/export", get(handlers::export_session_view::<S>))
        .route("/sessions/:session_id/parents", get(handlers::get_session_parents::<S>))
        .route("/sessions/:session_id/derive", post(handlers::derive_session_hybrid::<S>))
        // Persisted append-only table
        .route("/hybrids", post(handlers::insert_stored_hybrid::<S>))
        .route("/hybrids/view", get(handlers::get_stored_view::<S>))
        .route("/hybrids/export", get(handlers::export_stored_view::<S>))
        .route("/hybrids/export/all", get(handlers::export_all_stored::<S>))
        .route("/hybrids/parents", get(handlers::get_stored_parents::<S>))
        .route("/hybrids/derive", post(handlers::derive_stored_hybrid::<S>))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}
