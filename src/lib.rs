pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;
pub mod table;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::HybridError;

// Export logic types
pub use logic::{
    align_features, apply_view, derive_hybrid, enrich_records, load_model, score_record,
    LinearModel, ParentIndex, SuccessModel,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{HybridStore, SessionCache, SqliteStore};

pub use table::{export_view, read_records};

use std::sync::Arc;

/// Assemble the shared request state from explicitly constructed collaborators.
pub fn build_state<S: HybridStore>(
    store: Arc<S>,
    model: Option<Arc<dyn SuccessModel>>,
    config: &config::AppConfig,
) -> handlers::AppState<S> {
    if model.is_none() {
        log::warn!("{}", handlers::MODEL_UNAVAILABLE_WARNING);
    }
    Arc::new(handlers::HybridState {
        store,
        model,
        sessions: SessionCache::new(config.session_ttl()),
        max_min_heat: config.view.max_min_heat,
    })
}
