//! Canonical collection ownership and fetch bookkeeping.
//!
//! The synchronizer owns one collection per resource kind, the fetch status,
//! and a generation counter. Every fetch is tagged with the generation it
//! was issued under; a completion whose ticket is no longer the outstanding
//! one is discarded. Starting a fetch while another is in flight supersedes
//! the older one (cancel-and-restart).

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::ports::{UserDirectorySource, UserDirectorySourceError};
use super::{FetchStatus, Post, ResourceKind, User};

/// Handle for one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    generation: u64,
    kind: ResourceKind,
}

impl FetchTicket {
    /// Generation the fetch was issued under.
    pub const fn generation(self) -> u64 {
        self.generation
    }

    /// Resource kind the fetch targets.
    pub const fn kind(self) -> ResourceKind {
        self.kind
    }
}

/// Records returned by one successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedRecords {
    /// Response of `GET /users`.
    Users(Vec<User>),
    /// Response of `GET /posts`.
    Posts(Vec<Post>),
}

impl FetchedRecords {
    /// Resource kind these records belong to.
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Users(_) => ResourceKind::Users,
            Self::Posts(_) => ResourceKind::Posts,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            Self::Users(users) => users.len(),
            Self::Posts(posts) => posts.len(),
        }
    }

    /// Whether the response was empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a fetch completion was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCompletion {
    /// The collection for `kind` was replaced with `count` records.
    Applied {
        /// Kind whose collection was replaced.
        kind: ResourceKind,
        /// Size of the new collection.
        count: usize,
    },
    /// The fetch failed; collections are unchanged.
    Failed {
        /// Kind that failed to load.
        kind: ResourceKind,
        /// Reason surfaced in [`FetchStatus::Error`].
        message: String,
    },
    /// The ticket was superseded or its kind was deselected; nothing changed.
    Stale {
        /// The discarded ticket.
        ticket: FetchTicket,
    },
}

/// Issue records for `kind` from `source`.
///
/// # Errors
///
/// Propagates the source's [`UserDirectorySourceError`].
pub async fn fetch_records(
    source: &dyn UserDirectorySource,
    kind: ResourceKind,
) -> Result<FetchedRecords, UserDirectorySourceError> {
    match kind {
        ResourceKind::Users => source.list_users().await.map(FetchedRecords::Users),
        ResourceKind::Posts => source.list_posts().await.map(FetchedRecords::Posts),
    }
}

/// Owner of the canonical collections behind the list screen.
///
/// # Examples
/// ```
/// use client::domain::{FetchStatus, FetchedRecords, ListSynchronizer, ResourceKind, User, UserId};
///
/// let mut sync = ListSynchronizer::new(ResourceKind::Users);
/// let (ticket, _) = sync.begin_fetch();
/// assert_eq!(sync.status(), &FetchStatus::Loading);
///
/// let users = vec![User::new(UserId::new(1), "Alice", "a@x.com")];
/// sync.complete(ticket, Ok(FetchedRecords::Users(users)));
/// assert_eq!(sync.users().len(), 1);
/// assert_eq!(sync.status(), &FetchStatus::Success);
/// ```
#[derive(Debug)]
pub struct ListSynchronizer {
    active: ResourceKind,
    generation: u64,
    in_flight: Option<FetchTicket>,
    status: FetchStatus,
    users: Arc<[User]>,
    posts: Arc<[Post]>,
}

impl ListSynchronizer {
    /// Build an idle synchronizer with empty collections.
    pub fn new(active: ResourceKind) -> Self {
        Self {
            active,
            generation: 0,
            in_flight: None,
            status: FetchStatus::Idle,
            users: Arc::from(Vec::new()),
            posts: Arc::from(Vec::new()),
        }
    }

    /// Set the active resource kind without fetching.
    ///
    /// Switching kinds while a fetch is in flight invalidates that fetch and
    /// returns its ticket so the caller can abort the request. The status
    /// drops back to [`FetchStatus::Idle`] in that case.
    pub fn select_resource(&mut self, kind: ResourceKind) -> Option<FetchTicket> {
        if kind == self.active {
            return None;
        }
        self.active = kind;
        let Some(ticket) = self.in_flight.take() else {
            debug!(kind = %kind, "resource kind selected");
            return None;
        };
        self.status = FetchStatus::Idle;
        info!(
            generation = ticket.generation,
            from = %ticket.kind,
            to = %kind,
            "resource kind changed; in-flight fetch cancelled"
        );
        Some(ticket)
    }

    /// Start a fetch for the active kind.
    ///
    /// Moves the status to [`FetchStatus::Loading`] before returning. Any
    /// fetch still in flight is superseded and returned alongside the new
    /// ticket.
    pub fn begin_fetch(&mut self) -> (FetchTicket, Option<FetchTicket>) {
        self.generation = self.generation.wrapping_add(1);
        let ticket = FetchTicket {
            generation: self.generation,
            kind: self.active,
        };
        let superseded = self.in_flight.replace(ticket);
        self.status = FetchStatus::Loading;
        if let Some(old) = superseded {
            info!(
                generation = old.generation,
                superseded_by = ticket.generation,
                "in-flight fetch superseded"
            );
        }
        debug!(generation = ticket.generation, kind = %ticket.kind, "fetch started");
        (ticket, superseded)
    }

    /// Record the outcome of the fetch identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<FetchedRecords, UserDirectorySourceError>,
    ) -> FetchCompletion {
        if self.in_flight != Some(ticket) {
            debug!(
                generation = ticket.generation,
                kind = %ticket.kind,
                "stale fetch response discarded"
            );
            return FetchCompletion::Stale { ticket };
        }
        self.in_flight = None;

        match result {
            Ok(records) if records.kind() == ticket.kind => {
                let count = records.len();
                match records {
                    FetchedRecords::Users(users) => self.users = Arc::from(users),
                    FetchedRecords::Posts(posts) => self.posts = Arc::from(posts),
                }
                self.status = FetchStatus::Success;
                info!(generation = ticket.generation, kind = %ticket.kind, count, "fetch applied");
                FetchCompletion::Applied {
                    kind: ticket.kind,
                    count,
                }
            }
            Ok(records) => {
                let message = format!(
                    "expected {} records but received {}",
                    ticket.kind,
                    records.kind()
                );
                self.fail(ticket, message)
            }
            Err(error) => self.fail(ticket, error.to_string()),
        }
    }

    /// Issue a fetch for the active kind and apply its outcome.
    ///
    /// Holding `&mut self` across the request serializes fetches; use
    /// [`Self::begin_fetch`] and [`Self::complete`] directly when requests
    /// must overlap with other state changes.
    pub async fn fetch(&mut self, source: &dyn UserDirectorySource) -> FetchCompletion {
        let (ticket, _) = self.begin_fetch();
        let result = fetch_records(source, ticket.kind).await;
        self.complete(ticket, result)
    }

    fn fail(&mut self, ticket: FetchTicket, message: String) -> FetchCompletion {
        warn!(
            generation = ticket.generation,
            kind = %ticket.kind,
            error = %message,
            "fetch failed"
        );
        self.status = FetchStatus::Error(message.clone());
        FetchCompletion::Failed {
            kind: ticket.kind,
            message,
        }
    }

    /// Active resource kind.
    pub const fn active_resource(&self) -> ResourceKind {
        self.active
    }

    /// Current fetch status.
    pub const fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Outstanding fetch, if any.
    pub const fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    /// Canonical users collection.
    pub fn users(&self) -> Arc<[User]> {
        Arc::clone(&self.users)
    }

    /// Canonical posts collection.
    pub fn posts(&self) -> Arc<[Post]> {
        Arc::clone(&self.posts)
    }
}
