//! Runtime helpers injected into the user-list screen.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use super::DebounceSleeper;

/// Timing dependencies for debounce scheduling.
pub struct UserListRuntime {
    /// Sleeps out the quiescence window before a query is applied.
    pub sleeper: Arc<dyn DebounceSleeper>,
    /// Source of "now" for debounce deadlines.
    pub clock: Arc<dyn Clock>,
}

impl Default for UserListRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            clock: Arc::new(DefaultClock),
        }
    }
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl DebounceSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
