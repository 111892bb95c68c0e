//! HTTP handlers.

pub mod admin;
pub mod entries;
pub mod stars;
pub mod users;

use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Pagination metadata for list responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: usize,
    /// Maximum number of items per page
    pub limit: usize,
    /// Number of items skipped
    pub offset: usize,
    /// True if more items are available after this page
    pub has_more: bool,
}

/// List response wrapper with pagination metadata.
///
/// ```json
/// {
///   "data": [...],
///   "pagination": { "total": 42, "limit": 10, "offset": 0, "has_more": true }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        let has_more = offset + data.len() < total;
        Self {
            data,
            pagination: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        }
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_has_more() {
        let page = ListResponse::new(vec![1, 2], 5, 2, 0);
        assert!(page.pagination.has_more);

        let last = ListResponse::new(vec![5], 5, 2, 4);
        assert!(!last.pagination.has_more);
    }
}
