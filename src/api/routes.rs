//! API Routes
//!
//! Configures the Axum router with all registry endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, create_pedigree_handler, delete_pedigree_handler,
    family_tree_handler, find_by_pedigree_id_handler, get_pedigree_handler, health_handler,
    list_pedigrees_handler, next_id_handler, statistics_handler, update_pedigree_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /pedigrees`, `GET /pedigrees` - Create / list pedigrees
/// - `GET /pedigrees/next-id` - Suggested next pedigree ID
/// - `GET /pedigrees/statistics` - Memoized statistics
/// - `GET /pedigrees/pedigree-id/:pedigree_id` - Lookup by business ID
///   (also at `/pedigrees/search/:pedigree_id`)
/// - `GET|PATCH|DELETE /pedigrees/:id` - Single record
/// - `GET /pedigrees/:id/family-tree` - Ancestry
/// - `GET /cache/stats`, `DELETE /cache` - Cache diagnostics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Static segments take priority over `:id`
    Router::new()
        .route(
            "/pedigrees",
            get(list_pedigrees_handler).post(create_pedigree_handler),
        )
        .route("/pedigrees/next-id", get(next_id_handler))
        .route("/pedigrees/statistics", get(statistics_handler))
        .route(
            "/pedigrees/pedigree-id/:pedigree_id",
            get(find_by_pedigree_id_handler),
        )
        .route(
            "/pedigrees/search/:pedigree_id",
            get(find_by_pedigree_id_handler),
        )
        .route(
            "/pedigrees/:id",
            get(get_pedigree_handler)
                .patch(update_pedigree_handler)
                .delete(delete_pedigree_handler),
        )
        .route("/pedigrees/:id/family-tree", get(family_tree_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
