//! Reqwest-backed user directory adapter.
//!
//! This adapter owns transport details only: endpoint construction, timeout
//! and HTTP error mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{NewUserDto, PostDto, UserDto};
use crate::domain::ports::{UserDirectorySource, UserDirectorySourceError};
use crate::domain::{NewUser, Post, ResourceKind, User};

/// Public JSONPlaceholder instance.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
const DEFAULT_USER_AGENT: &str = "user-list-client/0.1";

/// Outbound identity sent with every request.
pub struct JsonPlaceholderHttpIdentity {
    /// HTTP user-agent header value.
    pub user_agent: String,
}

impl Default for JsonPlaceholderHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// User directory adapter issuing HTTP requests below one base URL.
pub struct JsonPlaceholderHttpSource {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl JsonPlaceholderHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let source = JsonPlaceholderHttpSource::new(base_url, timeout);
    /// assert!(source.is_ok() || source.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(base_url, timeout, JsonPlaceholderHttpIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        base_url: Url,
        timeout: Duration,
        identity: JsonPlaceholderHttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            user_agent: identity.user_agent,
        })
    }

    fn endpoint(&self, kind: ResourceKind) -> Result<Url, UserDirectorySourceError> {
        collection_endpoint(&self.base_url, kind)
    }

    async fn send_json<T>(&self, request: RequestBuilder) -> Result<T, UserDirectorySourceError>
    where
        T: DeserializeOwned + Send,
    {
        let response = request
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(status = status.as_u16(), bytes = body.len(), "user directory response");
        decode(body.as_ref())
    }
}

#[async_trait]
impl UserDirectorySource for JsonPlaceholderHttpSource {
    async fn list_users(&self) -> Result<Vec<User>, UserDirectorySourceError> {
        let endpoint = self.endpoint(ResourceKind::Users)?;
        let users: Vec<UserDto> = self.send_json(self.client.get(endpoint)).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, UserDirectorySourceError> {
        let endpoint = self.endpoint(ResourceKind::Posts)?;
        let posts: Vec<PostDto> = self.send_json(self.client.get(endpoint)).await?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, UserDirectorySourceError> {
        let endpoint = self.endpoint(ResourceKind::Users)?;
        let request = self.client.post(endpoint).json(&NewUserDto::from(user));
        let created: UserDto = self.send_json(request).await?;
        Ok(User::from(created))
    }
}

fn collection_endpoint(base: &Url, kind: ResourceKind) -> Result<Url, UserDirectorySourceError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            UserDirectorySourceError::invalid_request(format!(
                "base URL {base} cannot carry a path"
            ))
        })?
        .pop_if_empty()
        .push(kind.path_segment());
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, UserDirectorySourceError> {
    serde_json::from_slice(body).map_err(|error| {
        UserDirectorySourceError::decode(format!("invalid JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> UserDirectorySourceError {
    if error.is_timeout() {
        UserDirectorySourceError::timeout(error.to_string())
    } else if error.is_decode() {
        UserDirectorySourceError::decode(error.to_string())
    } else {
        UserDirectorySourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UserDirectorySourceError {
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        reason.to_owned()
    } else {
        format!("{reason}: {preview}")
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            UserDirectorySourceError::timeout(format!("status {}: {message}", status.as_u16()))
        }
        _ => UserDirectorySourceError::status(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut chars = compact.chars();
    let preview = chars.by_ref().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if chars.next().is_some() {
        format!("{preview}...")
    } else {
        preview
    }
}
