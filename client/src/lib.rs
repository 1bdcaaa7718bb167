//! Client library modules.
//!
//! The domain owns the user-list screen state (canonical collections, fetch
//! status, debounced search) and talks to the remote collection through the
//! [`domain::ports::UserDirectorySource`] port. Outbound adapters implement
//! that port over HTTP.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
