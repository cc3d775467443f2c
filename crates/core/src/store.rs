//! Remote content store client.
//!
//! Thin REST client for the content store holding the posts this tool
//! rewrites: fetch a post by id or slug, push updated content back, and
//! check the connection up front. Credentials come from the environment and
//! missing ones are the one fatal startup error this crate has.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

use crate::{Result, RetexoError};

/// Environment variable holding the store's base URL.
pub const ENV_STORE_URL: &str = "RETEXO_STORE_URL";
/// Environment variable holding the store username.
pub const ENV_STORE_USERNAME: &str = "RETEXO_STORE_USERNAME";
/// Environment variable holding the application password.
pub const ENV_STORE_APP_PASSWORD: &str = "RETEXO_STORE_APP_PASSWORD";

/// Store request timeout in seconds.
const STORE_TIMEOUT: u64 = 30;

/// Connection settings for the remote content store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store, without a trailing slash.
    pub base_url: String,
    /// Account username.
    pub username: String,
    /// Application password for basic auth.
    pub app_password: String,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl StoreConfig {
    /// Builds a config from explicit values.
    pub fn new(base_url: &str, username: &str, app_password: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            app_password: app_password.to_string(),
            timeout: STORE_TIMEOUT,
        }
    }

    /// Reads the config from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`RetexoError::ConfigError`] naming every missing variable —
    /// the caller should treat this as fatal at startup.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

        let base_url = read(ENV_STORE_URL);
        let username = read(ENV_STORE_USERNAME);
        let app_password = read(ENV_STORE_APP_PASSWORD);

        let missing: Vec<&str> = [
            (ENV_STORE_URL, base_url.is_none()),
            (ENV_STORE_USERNAME, username.is_none()),
            (ENV_STORE_APP_PASSWORD, app_password.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(RetexoError::ConfigError(format!(
                "missing required configuration: {}",
                missing.join(", ")
            )));
        }

        // The filters above guarantee all three are present.
        Ok(Self::new(
            &base_url.unwrap_or_default(),
            &username.unwrap_or_default(),
            &app_password.unwrap_or_default(),
        ))
    }
}

/// How a post URL resolves against the store: a numeric id or a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostIdentifier {
    Id(u64),
    Slug(String),
}

impl PostIdentifier {
    /// Extracts the identifier from a post URL: the trailing path segment,
    /// interpreted as an id when all digits and a slug otherwise.
    pub fn from_url(post_url: &str) -> Result<Self> {
        let url = Url::parse(post_url).map_err(|e| RetexoError::InvalidUrl(e.to_string()))?;

        let segment = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(str::to_string)
            .ok_or_else(|| RetexoError::InvalidUrl(format!("no post identifier in URL: {}", post_url)))?;

        match segment.parse::<u64>() {
            Ok(id) => Ok(PostIdentifier::Id(id)),
            Err(_) => Ok(PostIdentifier::Slug(segment)),
        }
    }
}

/// A post as the store returns it.
#[derive(Debug, Clone)]
pub struct RemotePost {
    pub id: u64,
    pub title: String,
    pub content: String,
}

/// Rendered-field wrapper used by the store's payloads.
#[derive(Debug, Deserialize)]
struct Rendered {
    rendered: String,
}

#[derive(Debug, Deserialize)]
struct PostPayload {
    id: u64,
    title: Rendered,
    content: Rendered,
}

impl From<PostPayload> for RemotePost {
    fn from(payload: PostPayload) -> Self {
        Self { id: payload.id, title: payload.title.rendered, content: payload.content.rendered }
    }
}

/// REST client for the content store.
pub struct StoreClient {
    http: Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Builds a client from the given config.
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(RetexoError::HttpError)?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp-json/wp/v2/{}", self.config.base_url, path)
    }

    /// Checks that the store is reachable with the configured credentials.
    pub async fn test_connection(&self) -> bool {
        let result = self
            .http
            .get(self.endpoint("types/post"))
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(base_url = %self.config.base_url, "connected to content store");
                true
            }
            Ok(response) => {
                error!(status = %response.status(), "content store rejected connection test");
                false
            }
            Err(e) => {
                error!(error = %e, "content store unreachable");
                false
            }
        }
    }

    /// Fetches a post by its public URL, resolving the trailing segment as
    /// id or slug.
    pub async fn get_post_by_url(&self, post_url: &str) -> Result<RemotePost> {
        match PostIdentifier::from_url(post_url)? {
            PostIdentifier::Id(id) => self.get_post_by_id(id).await,
            PostIdentifier::Slug(slug) => self.get_post_by_slug(&slug).await,
        }
    }

    /// Fetches a post by numeric id.
    pub async fn get_post_by_id(&self, id: u64) -> Result<RemotePost> {
        let response = self
            .http
            .get(self.endpoint(&format!("posts/{}", id)))
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RetexoError::PostNotFound(id.to_string()));
        }
        let response = response
            .error_for_status()
            .map_err(|e| RetexoError::StoreError(e.to_string()))?;

        let payload: PostPayload = response
            .json()
            .await
            .map_err(|e| RetexoError::StoreError(format!("malformed post payload: {}", e)))?;

        info!(id, title = %payload.title.rendered, "fetched post by id");
        Ok(payload.into())
    }

    /// Fetches a post by slug.
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<RemotePost> {
        let response = self
            .http
            .get(self.endpoint(&format!("posts?slug={}", slug)))
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| RetexoError::StoreError(e.to_string()))?;

        let posts: Vec<PostPayload> = response
            .json()
            .await
            .map_err(|e| RetexoError::StoreError(format!("malformed post list payload: {}", e)))?;

        let payload = posts
            .into_iter()
            .next()
            .ok_or_else(|| RetexoError::PostNotFound(slug.to_string()))?;

        info!(slug, id = payload.id, "fetched post by slug");
        Ok(payload.into())
    }

    /// Replaces a post's content.
    pub async fn update_post(&self, id: u64, content: &str) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint(&format!("posts/{}", id)))
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .json(&json!({ "content": content }))
            .send()
            .await?;

        let response = response
            .error_for_status()
            .map_err(|e| RetexoError::StoreError(e.to_string()))?;

        info!(id, status = %response.status(), "updated post content");
        Ok(())
    }
}
