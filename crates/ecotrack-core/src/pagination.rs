//! Offset pagination for list endpoints.
//!
//! - `limit`: Maximum number of items to return (1-100, default: 20)
//! - `offset`: Number of items to skip (minimum 0, default: 0)
//!
//! # Example JSON Response
//!
//! ```json
//! {
//!   "data": [...],
//!   "meta": { "total": 42, "limit": 20, "offset": 20, "has_more": true }
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `[1, MAX_LIMIT]`.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn meta(&self, total: i64) -> PaginationMeta {
        let limit = self.limit();
        let offset = self.offset();
        PaginationMeta {
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let params = PaginationParams {
            limit: Some(1000),
            offset: None,
        };
        assert_eq!(params.limit(), MAX_LIMIT);

        let params = PaginationParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn test_negative_offset_becomes_zero() {
        let params = PaginationParams {
            limit: None,
            offset: Some(-5),
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_meta_has_more() {
        let params = PaginationParams {
            limit: Some(10),
            offset: Some(10),
        };
        assert!(params.meta(25).has_more);
        assert!(!params.meta(20).has_more);
        assert_eq!(params.meta(25).offset, 10);
    }
}
