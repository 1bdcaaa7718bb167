//! Shared test doubles for user-list screen tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use tokio::sync::Notify;

use crate::domain::ports::{UserDirectorySource, UserDirectorySourceError};
use crate::domain::{DebounceSleeper, NewUser, Post, User, UserId};

/// Clock whose "now" only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let step = match TimeDelta::from_std(delta) {
            Ok(step) => step,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += step;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Sleeper that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl DebounceSleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that records requested durations and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper(pub Mutex<Vec<Duration>>);

#[async_trait]
impl DebounceSleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        let mut entries = match self.0.lock() {
            Ok(entries) => entries,
            Err(_) => panic!("sleeper mutex"),
        };
        entries.push(duration);
    }
}

/// Scripted user list response.
pub type UsersReply = Result<Vec<User>, UserDirectorySourceError>;
/// Scripted post list response.
pub type PostsReply = Result<Vec<Post>, UserDirectorySourceError>;

/// User directory double that replays queued responses in call order.
///
/// Once a queue runs dry the source answers with an empty collection. When a
/// gate is installed every list call waits for one [`Notify`] permit before
/// answering, which lets tests hold a fetch in flight.
#[derive(Default)]
pub struct ScriptedUserDirectorySource {
    users: Mutex<VecDeque<UsersReply>>,
    posts: Mutex<VecDeque<PostsReply>>,
    user_calls: AtomicUsize,
    post_calls: AtomicUsize,
    create_calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedUserDirectorySource {
    /// Build an ungated source with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source whose list calls wait on `gate`.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    /// Queue the next `GET /users` response.
    #[must_use]
    pub fn with_users(self, reply: UsersReply) -> Self {
        lock(&self.users).push_back(reply);
        self
    }

    /// Queue the next `GET /posts` response.
    #[must_use]
    pub fn with_posts(self, reply: PostsReply) -> Self {
        lock(&self.posts).push_back(reply);
        self
    }

    /// Number of `list_users` calls so far.
    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_posts` calls so far.
    pub fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    /// Number of `create_user` calls so far.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("script mutex"),
    }
}

#[async_trait]
impl UserDirectorySource for ScriptedUserDirectorySource {
    async fn list_users(&self) -> Result<Vec<User>, UserDirectorySourceError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        let reply = lock(&self.users).pop_front();
        reply.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, UserDirectorySourceError> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        let reply = lock(&self.posts).pop_front();
        reply.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, UserDirectorySourceError> {
        let calls = self.create_calls.fetch_add(1, Ordering::SeqCst);
        let id = u64::try_from(calls).unwrap_or(u64::MAX).saturating_add(11);
        Ok(User::new(UserId::new(id), user.username(), user.email()))
    }
}

/// Users named in the screen's acceptance scenarios.
pub fn sample_users() -> Vec<User> {
    vec![
        User::new(UserId::new(1), "Alice", "alice@example.com"),
        User::new(UserId::new(2), "bob", "bob@example.com"),
        User::new(UserId::new(3), "Bobby", "bobby@example.com"),
    ]
}
