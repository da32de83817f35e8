//! Predicate builder shared by the public listing, the JSON API and the admin listing.
//!
//! A `SoftwareFilter` is turned into a `WHERE` clause on a `QueryBuilder` whose `FROM`
//! aliases the software table as `s` and the uploader account as `a`. All user input
//! is bound, never interpolated.

use sqlx::{QueryBuilder, Sqlite};
use std::str::FromStr;

use crate::core::error::AppError;
use crate::shared::validation::contains_pattern;

/// Which surface is reading the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    /// Visitors: always active-only, search over title/description/version
    Public,
    /// Staff: status filter honored, search over title/description/uploader
    Admin,
}

/// Admin status filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(AppError::BadRequest(format!(
                "Unknown status filter '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SoftwareFilter {
    /// Trimmed, non-empty search term
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub status: StatusFilter,
    pub scope: FilterScope,
}

impl SoftwareFilter {
    pub fn public(search: Option<&str>, category_id: Option<i64>) -> Self {
        Self {
            search: normalize_search(search),
            category_id,
            status: StatusFilter::Active,
            scope: FilterScope::Public,
        }
    }

    pub fn admin(search: Option<&str>, category_id: Option<i64>, status: StatusFilter) -> Self {
        Self {
            search: normalize_search(search),
            category_id,
            status,
            scope: FilterScope::Admin,
        }
    }

    /// Append `WHERE ...` for every supplied predicate, joined with AND
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1 = 1");

        // Public reads are always restricted to active entries
        let status = match self.scope {
            FilterScope::Public => StatusFilter::Active,
            FilterScope::Admin => self.status,
        };
        match status {
            StatusFilter::All => {}
            StatusFilter::Active => {
                qb.push(" AND s.is_active = TRUE");
            }
            StatusFilter::Inactive => {
                qb.push(" AND s.is_active = FALSE");
            }
        }

        if let Some(category_id) = self.category_id {
            qb.push(" AND s.category_id = ").push_bind(category_id);
        }

        if let Some(term) = &self.search {
            let pattern = contains_pattern(term);
            let third_column = match self.scope {
                FilterScope::Public => "s.version",
                FilterScope::Admin => "a.username",
            };

            qb.push(" AND (s.title REGEXP ")
                .push_bind(pattern.clone())
                .push(" OR s.description REGEXP ")
                .push_bind(pattern.clone())
                .push(" OR ")
                .push(third_column)
                .push(" REGEXP ")
                .push_bind(pattern)
                .push(")");
        }
    }

    /// `ORDER BY` for this surface, newest first
    pub fn order_clause(&self) -> &'static str {
        match self.scope {
            FilterScope::Public => " ORDER BY s.upload_date DESC, s.id DESC",
            FilterScope::Admin => " ORDER BY s.created_at DESC, s.id DESC",
        }
    }
}

/// Empty or whitespace-only search terms count as absent
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse the `category` query parameter; empty means "any category"
pub fn parse_category_param(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid category '{}'", value))),
    }
}
