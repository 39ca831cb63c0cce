//! Turns raw list parameters into a [`UserQuery`].
//!
//! Nothing here rejects input. Values that do not parse fall back to their
//! defaults, so `?page_number=abc` behaves exactly like no `page_number`.

use axum_helpers::params::parse_lenient_int;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_NUMBER: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const DEFAULT_SORT_FIELD: &str = "email";

/// Raw query string of `GET /users`, kept as text so that bad values can be
/// defaulted instead of rejected. Built with [`ListUsersParams::from_pairs`];
/// the `IntoParams` derive only documents the parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// 1-based page number (default 1)
    pub page_number: Option<String>,
    /// Records per page (default 10)
    pub page_size: Option<String>,
    /// `field:direction`, direction `desc` or anything else for ascending (default `email:asc`)
    #[param(example = "name:desc")]
    pub sort: Option<String>,
    /// `field:pattern`, a case-insensitive regex match on one field
    #[param(example = "email:example.com")]
    pub search: Option<String>,
}

impl ListUsersParams {
    /// Collect from raw query pairs, keeping the first value of repeated keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page_number" => &mut params.page_number,
                "page_size" => &mut params.page_size,
                "sort" => &mut params.sort,
                "search" => &mut params.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `1` or `-1`, as a MongoDB sort document wants it.
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// One `field ~ /pattern/i` condition. The pattern is the caller's text, unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub field: String,
    pub pattern: String,
}

/// Normalized list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub page_number: i64,
    pub page_size: i64,
    pub sort_field: String,
    pub sort_order: SortOrder,
    pub search: Option<SearchTerm>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: DEFAULT_SORT_FIELD.to_string(),
            sort_order: SortOrder::Asc,
            search: None,
        }
    }
}

impl From<&ListUsersParams> for UserQuery {
    fn from(params: &ListUsersParams) -> Self {
        let (sort_field, sort_order) = parse_sort(params.sort.as_deref());
        Self {
            page_number: non_zero_or(params.page_number.as_deref(), DEFAULT_PAGE_NUMBER),
            page_size: non_zero_or(params.page_size.as_deref(), DEFAULT_PAGE_SIZE),
            sort_field,
            sort_order,
            search: parse_search(params.search.as_deref()),
        }
    }
}

impl UserQuery {
    /// Records to skip: `(page_number - 1) * page_size`. Negative for pages below 1.
    pub fn skip(&self) -> i64 {
        self.page_number
            .saturating_sub(1)
            .saturating_mul(self.page_size)
    }

    /// `ceil(total / page_size)`.
    pub fn total_pages(&self, total: u64) -> i64 {
        let total = i64::try_from(total).unwrap_or(i64::MAX);
        div_ceil(total, self.page_size)
    }
}

fn non_zero_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(parse_lenient_int)
        .filter(|n| *n != 0)
        .unwrap_or(default)
}

fn parse_sort(raw: Option<&str>) -> (String, SortOrder) {
    match raw {
        Some(sort) if !sort.is_empty() => {
            let mut parts = sort.split(':');
            let field = parts.next().unwrap_or_default().to_string();
            let order = match parts.next() {
                Some("desc") => SortOrder::Desc,
                _ => SortOrder::Asc,
            };
            (field, order)
        }
        _ => (DEFAULT_SORT_FIELD.to_string(), SortOrder::Asc),
    }
}

fn parse_search(raw: Option<&str>) -> Option<SearchTerm> {
    let mut parts = raw?.split(':');
    let field = parts.next().filter(|f| !f.is_empty())?;
    let pattern = parts.next().filter(|p| !p.is_empty())?;
    Some(SearchTerm {
        field: field.to_string(),
        pattern: pattern.to_string(),
    })
}

/// Ceiling division that rounds toward positive infinity for either sign.
fn div_ceil(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && ((r > 0) == (b > 0)) { q + 1 } else { q }
}
