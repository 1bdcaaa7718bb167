//! User details child component.
//!
//! The parent hands a user down and supplies a [`ParentNotifier`] when it
//! composes the child. The child only ever talks to that notifier; there is
//! no ambient event bus.

use std::fmt;
use std::sync::Arc;

use super::User;

/// Message sent from a child component to its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildMessage(String);

impl ChildMessage {
    /// Wrap a message body.
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Message body.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Take the message body.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ChildMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability a parent grants to a child for upward notifications.
pub trait ParentNotifier: Send + Sync {
    /// Deliver `message` to the parent.
    fn notify(&self, message: ChildMessage);
}

impl<F> ParentNotifier for F
where
    F: Fn(ChildMessage) + Send + Sync,
{
    fn notify(&self, message: ChildMessage) {
        self(message);
    }
}

/// Details panel for one user.
///
/// # Examples
/// ```
/// use std::sync::{Arc, Mutex};
/// use client::domain::{ChildMessage, User, UserDetails, UserId};
///
/// let received = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&received);
/// let details = UserDetails::new(
///     User::new(UserId::new(1), "Bret", "b@x.com"),
///     Arc::new(move |message: ChildMessage| {
///         sink.lock().expect("sink").push(message.into_inner());
///     }),
/// );
/// details.notify_parent();
/// assert_eq!(
///     received.lock().expect("sink").as_slice(),
///     ["User Bret clicked \"Notify\" button"]
/// );
/// ```
#[derive(Clone)]
pub struct UserDetails {
    user: User,
    notifier: Arc<dyn ParentNotifier>,
}

impl UserDetails {
    /// Compose a details child for `user` reporting to `notifier`.
    pub fn new(user: User, notifier: Arc<dyn ParentNotifier>) -> Self {
        Self { user, notifier }
    }

    /// User shown by this panel.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Tell the parent the notify button was pressed.
    pub fn notify_parent(&self) {
        let message = ChildMessage::new(format!(
            "User {} clicked \"Notify\" button",
            self.user.username()
        ));
        self.notifier.notify(message);
    }
}

impl fmt::Debug for UserDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDetails")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}
