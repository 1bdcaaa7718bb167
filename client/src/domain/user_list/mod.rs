//! User-list screen: the parent component composing list synchronisation,
//! debounced search and the details child.
//!
//! A single task owns every piece of mutable screen state and applies
//! commands strictly in arrival order. Fetches and debounce timers run as
//! spawned tasks that report back through the same command channel, so no
//! locks guard the collections or the query. Observers read immutable
//! [`UserListView`] snapshots from a `watch` channel.

mod event_loop;
mod runtime;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use super::debounce::{DEFAULT_DEBOUNCE_WINDOW, DebounceTicket};
use super::ports::UserDirectorySourceError;
use super::synchronizer::{FetchTicket, FetchedRecords};
use super::{
    ChildMessage, DomainError, FetchStatus, Post, ResourceKind, User, UserDetails, UserId,
};

pub use event_loop::UserListScreen;
pub use runtime::{TokioSleeper, UserListRuntime};

/// Async sleeping abstraction used by debounce timers.
#[async_trait]
pub trait DebounceSleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Static screen configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserListConfig {
    /// Resource kind active before the first selection.
    pub initial_resource: ResourceKind,
    /// Quiescence window for search input.
    pub debounce_window: Duration,
}

impl Default for UserListConfig {
    fn default() -> Self {
        Self {
            initial_resource: ResourceKind::default(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

/// Immutable snapshot of the screen published after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserListView {
    /// Active resource kind.
    pub resource: ResourceKind,
    /// Status of the most recent fetch.
    pub status: FetchStatus,
    /// Canonical users collection.
    pub users: Arc<[User]>,
    /// Canonical posts collection.
    pub posts: Arc<[Post]>,
    /// Users matching the applied query.
    pub filtered_users: Arc<[User]>,
    /// Last applied query, as typed.
    pub query: String,
    /// When the query still waiting in the debouncer becomes due.
    pub pending_deadline: Option<DateTime<Utc>>,
    /// User handed down to the details child.
    pub selected_user: Option<User>,
    /// Most recent message received from a child.
    pub last_child_message: Option<ChildMessage>,
}

#[derive(Debug)]
enum Command {
    SelectResource(ResourceKind),
    Fetch,
    SetQuery(String),
    SelectUser(Option<UserId>),
    ChildMessage(ChildMessage),
    FetchCompleted {
        ticket: FetchTicket,
        result: Result<FetchedRecords, UserDirectorySourceError>,
    },
    DebounceElapsed(DebounceTicket),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle used by the view layer to drive a running screen.
#[derive(Debug, Clone)]
pub struct UserListHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<UserListView>,
}

fn screen_stopped() -> DomainError {
    DomainError::service_unavailable("user list screen has stopped")
}

impl UserListHandle {
    fn send(&self, command: Command) -> Result<(), DomainError> {
        self.commands.send(command).map_err(|_| screen_stopped())
    }

    /// Change the active resource kind. Does not fetch.
    ///
    /// # Errors
    ///
    /// Returns [`super::ErrorCode::ServiceUnavailable`] once the screen has
    /// stopped.
    pub fn select_resource(&self, kind: ResourceKind) -> Result<(), DomainError> {
        self.send(Command::SelectResource(kind))
    }

    /// Fetch the active resource kind, superseding any fetch in flight.
    ///
    /// # Errors
    ///
    /// Returns [`super::ErrorCode::ServiceUnavailable`] once the screen has
    /// stopped.
    pub fn fetch(&self) -> Result<(), DomainError> {
        self.send(Command::Fetch)
    }

    /// Feed one keystroke's worth of search text into the debouncer.
    ///
    /// # Errors
    ///
    /// Returns [`super::ErrorCode::ServiceUnavailable`] once the screen has
    /// stopped.
    pub fn set_query(&self, text: impl Into<String>) -> Result<(), DomainError> {
        self.send(Command::SetQuery(text.into()))
    }

    /// Select the user passed down to the details child, or clear it.
    ///
    /// Ids that are not in the users collection clear the selection.
    ///
    /// # Errors
    ///
    /// Returns [`super::ErrorCode::ServiceUnavailable`] once the screen has
    /// stopped.
    pub fn select_user(&self, id: Option<UserId>) -> Result<(), DomainError> {
        self.send(Command::SelectUser(id))
    }

    /// Compose a details child for `user` whose notifications land in this
    /// screen.
    pub fn details(&self, user: User) -> UserDetails {
        let commands = self.commands.clone();
        UserDetails::new(
            user,
            Arc::new(move |message: ChildMessage| {
                if commands.send(Command::ChildMessage(message)).is_err() {
                    debug!("child message dropped; user list screen has stopped");
                }
            }),
        )
    }

    /// Details child for the currently selected user, if any.
    pub fn selected_details(&self) -> Option<UserDetails> {
        self.view().selected_user.map(|user| self.details(user))
    }

    /// Latest published snapshot.
    pub fn view(&self) -> UserListView {
        self.view.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<UserListView> {
        self.view.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`super::ErrorCode::ServiceUnavailable`] if the screen stops
    /// before the predicate holds.
    pub async fn wait_for<F>(&self, predicate: F) -> Result<UserListView, DomainError>
    where
        F: FnMut(&UserListView) -> bool,
    {
        let mut receiver = self.view.clone();
        let view = receiver
            .wait_for(predicate)
            .await
            .map_err(|_| screen_stopped())?;
        Ok(view.clone())
    }

    /// Tear the screen down: cancel the pending debounce timer and any
    /// in-flight fetch, then stop the event loop.
    ///
    /// # Errors
    ///
    /// Returns [`super::ErrorCode::ServiceUnavailable`] if the screen had
    /// already stopped.
    pub async fn shutdown(self) -> Result<(), DomainError> {
        let (ack, done) = oneshot::channel();
        self.send(Command::Shutdown(ack))?;
        done.await.map_err(|_| screen_stopped())
    }
}
