//! API Handlers
//!
//! HTTP request handlers for each registry endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::{self, CacheStats};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ClearCacheResponse, CreatePedigreeRequest, DeleteResponse, FamilyTreeParams, HealthResponse,
    ListPedigreesParams, NextIdResponse, PaginatedResponse, UpdatePedigreeRequest,
};
use crate::pedigree::{
    FamilyTreeNode, IdScheme, InMemoryPedigreeRepository, Pedigree, PedigreeRepository,
    PedigreeService, PedigreeStatistics,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pedigrees: PedigreeService,
}

impl AppState {
    /// Creates a new AppState around a service.
    pub fn new(pedigrees: PedigreeService) -> Self {
        Self { pedigrees }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses the in-memory repository and a fresh statistics cache.
    pub fn from_config(config: &Config) -> Self {
        Self::with_repository(config, Arc::new(InMemoryPedigreeRepository::new()))
    }

    /// Creates a new AppState over an existing repository.
    pub fn with_repository(config: &Config, repository: Arc<dyn PedigreeRepository>) -> Self {
        let cache = cache::shared(Duration::from_secs(config.default_ttl));
        let scheme = IdScheme::new(config.pedigree_id_prefix.clone(), config.pedigree_id_width);
        Self::new(PedigreeService::new(
            repository,
            cache,
            scheme,
            Duration::from_secs(config.statistics_ttl),
        ))
    }
}

/// Handler for POST /pedigrees
pub async fn create_pedigree_handler(
    State(state): State<AppState>,
    Json(req): Json<CreatePedigreeRequest>,
) -> Result<(StatusCode, Json<Pedigree>)> {
    let pedigree = state.pedigrees.create(req).await?;
    Ok((StatusCode::CREATED, Json(pedigree)))
}

/// Handler for GET /pedigrees
pub async fn list_pedigrees_handler(
    State(state): State<AppState>,
    Query(params): Query<ListPedigreesParams>,
) -> Result<Json<PaginatedResponse<Pedigree>>> {
    let query = params.into_query()?;
    Ok(Json(state.pedigrees.find_all(&query).await?))
}

/// Handler for GET /pedigrees/next-id
pub async fn next_id_handler(State(state): State<AppState>) -> Result<Json<NextIdResponse>> {
    let next = state.pedigrees.next_pedigree_id().await?;
    Ok(Json(NextIdResponse::new(next)))
}

/// Handler for GET /pedigrees/statistics
pub async fn statistics_handler(
    State(state): State<AppState>,
) -> Result<Json<PedigreeStatistics>> {
    Ok(Json(state.pedigrees.statistics().await?))
}

/// Handler for GET /pedigrees/pedigree-id/:pedigree_id and its search alias
pub async fn find_by_pedigree_id_handler(
    State(state): State<AppState>,
    Path(pedigree_id): Path<String>,
) -> Result<Json<Pedigree>> {
    Ok(Json(state.pedigrees.find_by_pedigree_id(&pedigree_id).await?))
}

/// Handler for GET /pedigrees/:id
pub async fn get_pedigree_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Pedigree>> {
    Ok(Json(state.pedigrees.find_one(id).await?))
}

/// Handler for GET /pedigrees/:id/family-tree
pub async fn family_tree_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<FamilyTreeParams>,
) -> Result<Json<FamilyTreeNode>> {
    let generations = params.generations()?;
    Ok(Json(state.pedigrees.family_tree(id, generations).await?))
}

/// Handler for PATCH /pedigrees/:id
pub async fn update_pedigree_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdatePedigreeRequest>,
) -> Result<Json<Pedigree>> {
    Ok(Json(state.pedigrees.update(id, req).await?))
}

/// Handler for DELETE /pedigrees/:id
pub async fn delete_pedigree_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    let removed = state.pedigrees.remove(id).await?;
    Ok(Json(DeleteResponse::new(removed.id, removed.pedigree_id)))
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.pedigrees.cache_stats().await)
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let removed = state.pedigrees.clear_cache().await;
    Json(ClearCacheResponse::new(removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
