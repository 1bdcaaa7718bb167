//! JSONPlaceholder outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `UserDirectorySource` port against a JSONPlaceholder-shaped REST API.

mod dto;
mod http_source;

pub use http_source::{
    DEFAULT_BASE_URL, JsonPlaceholderHttpIdentity, JsonPlaceholderHttpSource,
};
