//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps() {
        let p = PaginationParams {
            limit: Some(10_000),
            offset: Some(-4),
        };
        assert_eq!(p.limit(), MAX_LIMIT);
        assert_eq!(p.offset(), 0);

        let p = PaginationParams {
            limit: None,
            offset: None,
        };
        assert_eq!(p.limit(), DEFAULT_LIMIT);
    }
}
