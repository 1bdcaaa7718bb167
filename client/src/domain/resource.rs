//! Resource kinds selectable from the list screen dropdown.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the fixed collections the remote source exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// The `users` collection.
    #[default]
    Users,
    /// The `posts` collection.
    Posts,
}

impl ResourceKind {
    /// Every selectable kind, in dropdown order.
    pub const ALL: [Self; 2] = [Self::Users, Self::Posts];

    /// Path segment appended to the source base URL.
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Posts => "posts",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Returned when a string does not name a [`ResourceKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind '{raw}' (expected one of: users, posts)")]
pub struct ParseResourceKindError {
    raw: String,
}

impl FromStr for ResourceKind {
    type Err = ParseResourceKindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == normalised)
            .ok_or_else(|| ParseResourceKindError {
                raw: raw.to_owned(),
            })
    }
}
