//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::{
    DEFAULT_DEBOUNCE_WINDOW, ParseResourceKindError, ResourceKind, UserListConfig,
};
use crate::outbound::jsonplaceholder::DEFAULT_BASE_URL;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Raised when a configured value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientSettingsError {
    /// `base_url` is not an absolute URL.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser failure detail.
        reason: String,
    },
    /// `resource` does not name a known collection.
    #[error(transparent)]
    InvalidResource(#[from] ParseResourceKindError),
}

/// Configuration values for the user-list client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_LIST")]
pub struct ClientSettings {
    /// Base URL of the REST collection.
    pub base_url: Option<String>,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Search debounce window, in milliseconds.
    pub debounce_ms: Option<u64>,
    /// Resource kind selected when the screen opens.
    pub resource: Option<String>,
}

impl ClientSettings {
    /// Return the configured base URL, falling back to the public instance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientSettingsError::InvalidBaseUrl`] when the value does not
    /// parse.
    pub fn base_url(&self) -> Result<Url, ClientSettingsError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw).map_err(|error| ClientSettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            reason: error.to_string(),
        })
    }

    /// Return the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Return the debounce window.
    pub fn debounce_window(&self) -> Duration {
        self.debounce_ms
            .map_or(DEFAULT_DEBOUNCE_WINDOW, Duration::from_millis)
    }

    /// Return the initial resource kind.
    ///
    /// # Errors
    ///
    /// Returns [`ClientSettingsError::InvalidResource`] for unknown kinds.
    pub fn resource(&self) -> Result<ResourceKind, ClientSettingsError> {
        let parsed = self.resource.as_deref().map(str::parse).transpose()?;
        Ok(parsed.unwrap_or_default())
    }

    /// Screen configuration derived from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientSettingsError::InvalidResource`] for unknown kinds.
    pub fn user_list_config(&self) -> Result<UserListConfig, ClientSettingsError> {
        Ok(UserListConfig {
            initial_resource: self.resource()?,
            debounce_window: self.debounce_window(),
        })
    }
}
