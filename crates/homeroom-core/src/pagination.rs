//! Pagination parameters and response metadata for list endpoints.
//!
//! Endpoints accept either offset-based (`limit` + `offset`) or
//! page-based (`limit` + `page`, 1-indexed) pagination; `page` wins when
//! both are supplied. `limit` is clamped to `[1, 200]` with a default of
//! 25 (one classroom roster fits on a page).

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters arrive as strings; empty strings mean "not set".
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Metadata block included alongside paginated data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of items across all pages.
    pub total: i64,
    /// The limit that was applied.
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether more items exist past this page.
    pub has_more: bool,
}

impl PaginationMeta {
    /// Builds the metadata for a page of results.
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        Self {
            total,
            limit,
            offset: Some(offset),
            page: params.page(),
            has_more: offset + limit < total,
        }
    }
}

/// Pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-200, default 25).
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of items to skip (ignored if `page` is set).
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// Page number, 1-indexed. Takes precedence over `offset`.
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    /// Effective limit, clamped to `[1, 200]`, default 25.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(25).clamp(1, 200)
    }

    /// Effective offset: derived from `page` when present, otherwise the
    /// explicit offset clamped to at least 0.
    #[must_use]
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            (page.max(1) - 1) * self.limit()
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    /// Page number if one was supplied, clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}
