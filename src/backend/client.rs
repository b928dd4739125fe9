//! HTTP client for the Supabase REST (PostgREST) and auth (GoTrue) APIs.
//!
//! Every request authenticates with the service-role key, sent both as the
//! `apikey` header and as a bearer token.

use crate::backend::SupabaseBackend;
use crate::config::SupabaseConfig;
use crate::error::{ApiError, ServerError, ServerResult};
use crate::models::{Pagination, TableQuery, UsersPage, UsersResponse};
use reqwest::{Client, RequestBuilder, Response, header};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

const REST_PATH: &str = "rest/v1";
const AUTH_ADMIN_PATH: &str = "auth/v1/admin";
const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Supabase API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    service_role_key: String,
}

impl SupabaseClient {
    /// Create a client for the project described by `config`.
    pub fn new(config: &SupabaseConfig) -> ServerResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("supabase-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServerError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.url.clone(),
            service_role_key: config.service_role_key.clone(),
        })
    }

    /// Build `{base}/{prefix}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, prefix: &str, segments: &[&str]) -> ServerResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ServerError::internal("Supabase URL cannot be a base URL"))?;
            path.pop_if_empty();
            path.extend(prefix.split('/'));
            path.extend(segments);
        }
        Ok(url)
    }

    /// URL for a table query, including its PostgREST parameters.
    pub fn table_url(&self, query: &TableQuery) -> ServerResult<Url> {
        let mut url = self.endpoint(REST_PATH, &[&query.table])?;
        url.query_pairs_mut().extend_pairs(query.to_params());
        Ok(url)
    }

    /// URL for a database function call.
    pub fn rpc_url(&self, function: &str) -> ServerResult<Url> {
        self.endpoint(REST_PATH, &["rpc", function])
    }

    /// URL for one page of the auth user listing.
    pub fn users_url(&self, page: u32, per_page: u32) -> ServerResult<Url> {
        let mut url = self.endpoint(AUTH_ADMIN_PATH, &["users"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        Ok(url)
    }

    /// URL for a single auth user.
    pub fn user_url(&self, user_id: &str) -> ServerResult<Url> {
        self.endpoint(AUTH_ADMIN_PATH, &["users", user_id])
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    /// Turn a non-success response into an upstream error.
    async fn check(response: Response) -> ServerResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), &body).into())
    }

    /// Decode a success body, mapping an empty body to JSON `null`.
    async fn decode<T: DeserializeOwned>(response: Response) -> ServerResult<T> {
        let bytes = response.bytes().await?;
        let decoded = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(JsonValue::Null)
        } else {
            serde_json::from_slice(&bytes)
        };
        decoded.map_err(|e| ServerError::http(format!("invalid JSON response: {}", e)))
    }
}

impl SupabaseBackend for SupabaseClient {
    async fn select(&self, query: &TableQuery) -> ServerResult<JsonValue> {
        let url = self.table_url(query)?;
        debug!(table = %query.table, url = %url, "Running table query");

        let response = self
            .authorized(self.http.get(url))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        Self::decode(Self::check(response).await?).await
    }

    async fn rpc(&self, function: &str, params: JsonValue) -> ServerResult<JsonValue> {
        let url = self.rpc_url(function)?;
        debug!(function, "Calling database function");

        let response = self
            .authorized(self.http.post(url))
            .json(&params)
            .send()
            .await?;
        Self::decode(Self::check(response).await?).await
    }

    async fn list_users(&self, page: u32, per_page: u32) -> ServerResult<UsersPage> {
        let url = self.users_url(page, per_page)?;
        debug!(page, per_page, "Listing auth users");

        let response = Self::check(self.authorized(self.http.get(url)).send().await?).await?;
        let header_str = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let pagination = Pagination::from_headers(
            header_str(TOTAL_COUNT_HEADER).as_deref(),
            header_str(header::LINK.as_str()).as_deref(),
        );

        let body: Option<UsersResponse> = Self::decode(response).await?;
        Ok(UsersPage::new(body.unwrap_or_default(), pagination))
    }

    async fn get_user(&self, user_id: &str) -> ServerResult<JsonValue> {
        let url = self.user_url(user_id)?;
        debug!(user_id, "Fetching auth user");

        let response = self.authorized(self.http.get(url)).send().await?;
        Self::decode(Self::check(response).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterSpec, OrderSpec};

    fn test_client(url: &str) -> SupabaseClient {
        let config = SupabaseConfig::new(url, "service-role-key").unwrap();
        SupabaseClient::new(&config).unwrap()
    }

    #[test]
    fn test_table_url() {
        let client = test_client("https://abc.supabase.co");
        let query = TableQuery::from("projects")
            .select("id,name")
            .filter(FilterSpec::parse("id=eq.123").unwrap())
            .order(OrderSpec::parse("created_at.desc").unwrap())
            .limit(5);
        let url = client.table_url(&query).unwrap();

        assert_eq!(url.path(), "/rest/v1/projects");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("select".to_string(), "id,name".to_string())));
        assert!(pairs.contains(&("id".to_string(), "eq.123".to_string())));
        assert!(pairs.contains(&("order".to_string(), "created_at.desc".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "5".to_string())));
    }

    #[test]
    fn test_table_url_encodes_table_name() {
        let client = test_client("https://abc.supabase.co");
        let url = client.table_url(&TableQuery::from("my table/x")).unwrap();
        assert_eq!(url.path(), "/rest/v1/my%20table%2Fx");
    }

    #[test]
    fn test_base_url_with_path() {
        let client = test_client("http://localhost:54321/");
        let url = client.rpc_url("exec_migration").unwrap();
        assert_eq!(url.as_str(), "http://localhost:54321/rest/v1/rpc/exec_migration");

        let client = test_client("https://proxy.example.com/supabase");
        let url = client.rpc_url("exec_migration").unwrap();
        assert_eq!(url.path(), "/supabase/rest/v1/rpc/exec_migration");
    }

    #[test]
    fn test_users_urls() {
        let client = test_client("https://abc.supabase.co");
        let url = client.users_url(1, 50).unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc.supabase.co/auth/v1/admin/users?page=1&per_page=50"
        );

        let url = client
            .user_url("3f2b8c1e-7a4d-4e3b-9c2a-1b2c3d4e5f60")
            .unwrap();
        assert_eq!(
            url.path(),
            "/auth/v1/admin/users/3f2b8c1e-7a4d-4e3b-9c2a-1b2c3d4e5f60"
        );
    }
}
