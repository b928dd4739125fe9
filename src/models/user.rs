//! Auth user listing models.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Default page size for user listings.
pub const DEFAULT_USERS_PER_PAGE: u32 = 50;

/// Body returned by `GET /auth/v1/admin/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<JsonValue>,
    #[serde(default)]
    pub aud: Option<String>,
}

/// Pagination metadata derived from the `x-total-count` and `link` headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub next_page: Option<u32>,
    pub last_page: u32,
    pub total: u64,
}

impl Pagination {
    /// Parse pagination headers.
    ///
    /// The `link` header looks like
    /// `</admin/users?page=2&per_page=50>; rel="next", </admin/users?page=4&per_page=50>; rel="last"`.
    pub fn from_headers(total_count: Option<&str>, link: Option<&str>) -> Self {
        let mut pagination = Self {
            total: total_count
                .and_then(|t| t.trim().parse().ok())
                .unwrap_or_default(),
            ..Self::default()
        };

        for entry in link.unwrap_or_default().split(',') {
            let Some((target, rel)) = entry.split_once(';') else {
                continue;
            };
            let Some(page) = page_param(target) else {
                continue;
            };
            let rel = rel
                .trim()
                .trim_start_matches("rel=")
                .trim_matches('"');
            match rel {
                "next" => pagination.next_page = Some(page),
                "last" => pagination.last_page = page,
                _ => {}
            }
        }

        pagination
    }
}

/// Extract the `page` query parameter from a `<url>` link target.
fn page_param(target: &str) -> Option<u32> {
    let target = target.trim().trim_start_matches('<').trim_end_matches('>');
    let (_, query) = target.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("page="))
        .and_then(|page| page.parse().ok())
}

/// A page of auth users together with pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersPage {
    pub users: Vec<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

impl UsersPage {
    pub fn new(response: UsersResponse, pagination: Pagination) -> Self {
        Self {
            users: response.users,
            aud: response.aud,
            pagination,
        }
    }
}
