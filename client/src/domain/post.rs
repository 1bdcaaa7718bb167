//! Post data model for the `posts` resource.

use serde::Serialize;

use super::UserId;

/// A post as returned by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: u64,
    user_id: UserId,
    title: String,
    body: String,
}

impl Post {
    /// Build a post record.
    pub fn new(id: u64, user_id: UserId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            user_id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Server-assigned identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Author of the post.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Post headline.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Post text.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }
}
