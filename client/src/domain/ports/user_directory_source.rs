//! Driven port for reading and writing the remote user directory.
//!
//! The domain owns the record shapes and the error contract so the list
//! screen stays adapter-agnostic.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{NewUser, Post, User, UserId};

define_port_error! {
    /// Errors surfaced while calling the remote user directory.
    pub enum UserDirectorySourceError {
        /// Network transport failed before receiving a response.
        Transport {
            /// Transport failure detail.
            message: String,
        } => "user directory transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout {
            /// Timeout detail.
            message: String,
        } => "user directory timeout: {message}",
        /// The source answered with a non-success status.
        Status {
            /// HTTP status code.
            status: u16,
            /// Status line plus a preview of the response body.
            message: String,
        } => "user directory returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode {
            /// Decoder failure detail.
            message: String,
        } => "user directory response decode failed: {message}",
        /// The adapter rejected the request before execution.
        InvalidRequest {
            /// Rejection detail.
            message: String,
        } => "user directory request invalid: {message}",
    }
}

/// Port for the remote collection behind the user-list screen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectorySource: Send + Sync {
    /// Fetch the `users` collection in server order.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use client::domain::ports::{FixtureUserDirectorySource, UserDirectorySource};
    ///
    /// let source = FixtureUserDirectorySource;
    /// let users = source.list_users().await?;
    /// assert_eq!(users.len(), 2);
    /// # Ok::<(), client::domain::ports::UserDirectorySourceError>(())
    /// ```
    async fn list_users(&self) -> Result<Vec<User>, UserDirectorySourceError>;

    /// Fetch the `posts` collection in server order.
    async fn list_posts(&self) -> Result<Vec<Post>, UserDirectorySourceError>;

    /// Create a user; the source echoes the record with its assigned id.
    async fn create_user(&self, user: &NewUser) -> Result<User, UserDirectorySourceError>;
}

/// Fixture implementation returning a small, fixed directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserDirectorySource;

/// Identifier the fixture assigns to created users.
const FIXTURE_CREATED_ID: u64 = 11;

#[async_trait]
impl UserDirectorySource for FixtureUserDirectorySource {
    async fn list_users(&self) -> Result<Vec<User>, UserDirectorySourceError> {
        Ok(vec![
            User::new(UserId::new(1), "Bret", "Sincere@april.biz"),
            User::new(UserId::new(2), "Antonette", "Shanna@melissa.tv"),
        ])
    }

    async fn list_posts(&self) -> Result<Vec<Post>, UserDirectorySourceError> {
        Ok(vec![Post::new(
            1,
            UserId::new(1),
            "sunt aut facere repellat",
            "quia et suscipit",
        )])
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, UserDirectorySourceError> {
        Ok(User::new(
            UserId::new(FIXTURE_CREATED_ID),
            user.username(),
            user.email(),
        ))
    }
}
