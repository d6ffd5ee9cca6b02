//! Response DTOs for the registry API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for GET /pedigrees/next-id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextIdResponse {
    /// Suggested identifier; not reserved
    pub next_pedigree_id: String,
}

impl NextIdResponse {
    pub fn new(next_pedigree_id: impl Into<String>) -> Self {
        Self {
            next_pedigree_id: next_pedigree_id.into(),
        }
    }
}

/// Paging metadata for list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    /// Derives page counts from the total and a normalized page/limit
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let limit_wide = u64::from(limit.max(1));
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit_wide),
            has_next: total > u64::from(page) * limit_wide,
            has_prev: page > 1,
        }
    }
}

/// A page of records
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Response body for DELETE /pedigrees/:id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    pub id: u64,
    pub pedigree_id: String,
}

impl DeleteResponse {
    pub fn new(id: u64, pedigree_id: impl Into<String>) -> Self {
        let pedigree_id = pedigree_id.into();
        Self {
            message: format!("Pedigree '{}' deleted successfully", pedigree_id),
            id,
            pedigree_id,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
    /// Number of entries dropped
    pub removed: usize,
}

impl ClearCacheResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} cache entries", removed),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
