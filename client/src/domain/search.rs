//! Debounced search box state.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::debounce::{DebounceState, DebounceTicket, Debouncer};
use super::{User, filter_users};

/// Search box component: holds the last applied query and debounces new
/// ones.
///
/// Recomputation never happens on [`SearchFilter::set_query`]; a query only
/// becomes the applied query once its quiescence window elapses, and
/// intermediate values inside a window are dropped unevaluated.
#[derive(Debug)]
pub struct SearchFilter {
    debouncer: Debouncer<String>,
    applied: String,
}

impl SearchFilter {
    /// Build a filter with an empty applied query.
    pub const fn new(window: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(window),
            applied: String::new(),
        }
    }

    /// Record a new query without recomputing.
    pub fn set_query(&mut self, text: impl Into<String>, now: DateTime<Utc>) -> DebounceTicket {
        self.debouncer.schedule(text.into(), now)
    }

    /// Apply the pending query if `ticket` is still current.
    ///
    /// Returns whether a query was applied.
    pub fn fire(&mut self, ticket: DebounceTicket) -> bool {
        let Some(query) = self.debouncer.fire(ticket) else {
            return false;
        };
        self.applied = query;
        true
    }

    /// Apply the pending query if its deadline has elapsed.
    ///
    /// Returns whether a query was applied.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        let Some(query) = self.debouncer.poll(now) else {
            return false;
        };
        self.applied = query;
        true
    }

    /// Drop any pending query. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.debouncer.cancel()
    }

    /// Last applied query, exactly as typed.
    pub fn applied_query(&self) -> &str {
        self.applied.as_str()
    }

    /// Debounce state of the next query.
    pub fn pending(&self) -> DebounceState {
        self.debouncer.state()
    }

    /// Quiescence window.
    pub const fn window(&self) -> Duration {
        self.debouncer.window()
    }

    /// Filter `collection` with the last applied query.
    pub fn current_filtered_view(&self, collection: &[User]) -> Vec<User> {
        filter_users(collection, &self.applied)
    }
}
