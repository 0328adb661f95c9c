//! Upstream Blogger v3 REST client.
//!
//! Each method forwards a single HTTP call and returns the typed payload
//! unchanged, or fails with [`RelayError::Upstream`] carrying the original
//! cause. No retries, no backoff.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use blogrelay_types::{
    Blog, BlogList, NewPost, Post, PostList, PostPatch, RelayError, RelayResult,
    UnsupportedOperation,
};

/// Default upstream endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/blogger/v3";

/// Artificial latency for the simulated create_blog call, keeping its
/// response timing consistent with real upstream round-trips.
const CREATE_BLOG_DELAY: Duration = Duration::from_millis(500);

/// Construction parameters for [`BloggerClient`].
#[derive(Debug, Clone)]
pub struct BloggerClientConfig {
    /// Pre-shared API key, forwarded as the `key` query parameter
    pub api_key: String,
    /// Upstream base URL; override for tests
    pub base_url: String,
    /// Page size used when a caller does not pass `max_results`
    pub default_max_results: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for BloggerClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            default_max_results: 10,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the upstream Blogger content service.
#[derive(Debug, Clone)]
pub struct BloggerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    default_max_results: u32,
}

impl BloggerClient {
    /// Build a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Internal` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: BloggerClientConfig) -> RelayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RelayError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            default_max_results: config.default_max_results,
        })
    }

    /// Page size applied when a caller passes no explicit `max_results`.
    #[must_use]
    pub fn default_max_results(&self) -> u32 {
        self.default_max_results
    }

    /// List all blogs accessible to the authenticated user.
    pub async fn list_blogs(&self) -> RelayResult<BlogList> {
        let url = format!("{}/users/self/blogs", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// Fetch one blog by id.
    pub async fn get_blog(&self, blog_id: &str) -> RelayResult<Blog> {
        let url = format!("{}/blogs/{blog_id}", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// Simulated blog creation.
    ///
    /// The upstream API cannot create blogs; this never performs a request.
    /// It waits briefly and returns a structured explanatory payload instead
    /// of an error, so callers receive a normal (error-flagged) response.
    pub async fn create_blog(&self, name: &str, _description: Option<&str>) -> UnsupportedOperation {
        debug!(blog_name = %name, "create_blog requested; upstream does not support it");
        tokio::time::sleep(CREATE_BLOG_DELAY).await;
        UnsupportedOperation::create_blog()
    }

    /// List posts of a blog, most recent first, bounded by `max_results`
    /// (configured default when `None`).
    pub async fn list_posts(&self, blog_id: &str, max_results: Option<u32>) -> RelayResult<PostList> {
        let url = format!("{}/blogs/{blog_id}/posts", self.base_url);
        let limit = max_results.unwrap_or(self.default_max_results).to_string();
        self.get_json(&url, &[("maxResults", limit.as_str())]).await
    }

    /// Fetch one post by id.
    pub async fn get_post(&self, blog_id: &str, post_id: &str) -> RelayResult<Post> {
        let url = format!("{}/blogs/{blog_id}/posts/{post_id}", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// Create a post in a blog.
    pub async fn create_post(&self, blog_id: &str, post: &NewPost) -> RelayResult<Post> {
        let url = format!("{}/blogs/{blog_id}/posts", self.base_url);
        let response = self
            .http
            .post(&url)
            .query(&self.auth_query())
            .json(post)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    /// Update an existing post. Fields absent from the patch are untouched.
    pub async fn update_post(
        &self,
        blog_id: &str,
        post_id: &str,
        patch: &PostPatch,
    ) -> RelayResult<Post> {
        let url = format!("{}/blogs/{blog_id}/posts/{post_id}", self.base_url);
        let response = self
            .http
            .put(&url)
            .query(&self.auth_query())
            .json(patch)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    /// Delete a post.
    pub async fn delete_post(&self, blog_id: &str, post_id: &str) -> RelayResult<()> {
        let url = format!("{}/blogs/{blog_id}/posts/{post_id}", self.base_url);
        let response = self
            .http
            .delete(&url)
            .query(&self.auth_query())
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(upstream_failure(status.as_u16(), response).await)
        }
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        vec![("key", self.api_key.clone())]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> RelayResult<T> {
        let response = self
            .http
            .get(url)
            .query(&self.auth_query())
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}

// RelayError lives in the dependency-light types crate, so reqwest::Error
// conversion happens here rather than via From (orphan rules).
fn transport_error(err: reqwest::Error) -> RelayError {
    RelayError::upstream(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> RelayResult<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| RelayError::upstream(format!("invalid upstream payload: {e}")))
    } else {
        Err(upstream_failure(status.as_u16(), response).await)
    }
}

async fn upstream_failure(status: u16, response: reqwest::Response) -> RelayError {
    let body = response.text().await.unwrap_or_default();
    RelayError::upstream_status(status, extract_message(&body))
}

/// Pull the human-readable message out of an upstream error body, falling
/// back to the raw body (or the bare status) when the shape is unfamiliar.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    if body.is_empty() {
        "upstream returned an error with no body".to_string()
    } else {
        body.to_string()
    }
}
