//! User data model.
//!
//! [`User`] is the record fetched from the remote collection and is accepted
//! as the server sends it. [`NewUser`] is the draft submitted through the
//! add-user form and is validated before it can reach a port.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Validation errors returned while building a [`NewUser`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was blank.
    #[error("username is required")]
    EmptyUsername,
    /// Username was shorter than the allowed minimum.
    #[error("username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
    /// Email was blank.
    #[error("email is required")]
    EmptyEmail,
    /// Email did not look like `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
}

/// Stable user identifier assigned by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Access the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user as returned by the remote collection.
///
/// Immutable once fetched; two users are the same record when their ids
/// match.
///
/// # Examples
/// ```
/// use client::domain::{User, UserId};
///
/// let user = User::new(UserId::new(1), "Alice", "a@x.com");
/// assert_eq!(user.username(), "Alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
}

impl User {
    /// Build a user record.
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Server-assigned identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login handle used by the search box.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Contact address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Minimum allowed length for a submitted username.
pub const USERNAME_MIN: usize = 3;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated draft sent to the remote source when adding a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    username: String,
    email: String,
}

impl NewUser {
    /// Validate and construct a [`NewUser`], reporting the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`UserValidationError`] found, checking the username
    /// before the email.
    pub fn try_new(
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let name: String = username.into();
        let address: String = email.into();
        validate_username(&name)?;
        validate_email(&address)?;
        Ok(Self {
            username: name,
            email: address,
        })
    }

    /// Submitted username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Submitted email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Check the username rules: required, at least [`USERNAME_MIN`] characters.
///
/// # Errors
///
/// Returns [`UserValidationError::EmptyUsername`] or
/// [`UserValidationError::UsernameTooShort`].
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.trim().is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }
    if username.chars().count() < USERNAME_MIN {
        return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
    }
    Ok(())
}

/// Check the email rules: required and shaped like `local@domain.tld`.
///
/// # Errors
///
/// Returns [`UserValidationError::EmptyEmail`] or
/// [`UserValidationError::InvalidEmail`].
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }
    if !email_regex().is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn accepts_valid_draft() {
        let draft = NewUser::try_new("ada", "ada@example.com").expect("valid draft");
        assert_eq!(draft.username(), "ada");
        assert_eq!(draft.email(), "ada@example.com");
    }

    #[rstest]
    #[case("", UserValidationError::EmptyUsername)]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    fn rejects_invalid_usernames(#[case] username: &str, #[case] expected: UserValidationError) {
        let err = NewUser::try_new(username, "ok@example.com").expect_err("username must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("not-an-email", UserValidationError::InvalidEmail)]
    #[case("a@b", UserValidationError::InvalidEmail)]
    #[case("a b@x.com", UserValidationError::InvalidEmail)]
    fn rejects_invalid_emails(#[case] email: &str, #[case] expected: UserValidationError) {
        let err = NewUser::try_new("ada", email).expect_err("email must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn username_is_checked_before_email() {
        let err = NewUser::try_new("", "").expect_err("both invalid");
        assert_eq!(err, UserValidationError::EmptyUsername);
    }

    #[rstest]
    fn user_serialises_with_flat_id() {
        let user = User::new(UserId::new(7), "bob", "b@x.com");
        let json = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(
            json,
            serde_json::json!({ "id": 7, "username": "bob", "email": "b@x.com" })
        );
    }
}
