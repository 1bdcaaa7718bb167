//! Add-user form service.
//!
//! Validates the draft (username required with a minimum length, email
//! required and well formed) and only then submits it through the
//! [`UserDirectorySource`] port.

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{UserDirectorySource, UserDirectorySourceError};
use super::user::{validate_email, validate_username};
use super::{NewUser, User, UserValidationError};

/// Message shown after a failed submission.
pub const ADD_USER_FAILED_MESSAGE: &str = "Failed to add user.";

/// Raw, unvalidated form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    /// Username field.
    pub username: String,
    /// Email field.
    pub email: String,
}

impl UserDraft {
    /// Build a draft from field values.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Validate every field, collecting one error per invalid field.
    ///
    /// # Errors
    ///
    /// Returns the per-field [`UserValidationError`]s when any field fails.
    pub fn validate(&self) -> Result<NewUser, Vec<UserValidationError>> {
        let errors: Vec<_> = [
            validate_username(&self.username).err(),
            validate_email(&self.email).err(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !errors.is_empty() {
            return Err(errors);
        }
        NewUser::try_new(self.username.as_str(), self.email.as_str()).map_err(|error| vec![error])
    }
}

/// Result of one submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The source created the user.
    Created(User),
    /// The draft failed validation; the port was not called.
    Invalid(Vec<UserValidationError>),
    /// The port call failed.
    Failed(UserDirectorySourceError),
}

/// Add-user form state: current draft plus the last status message.
pub struct AddUserForm {
    source: Arc<dyn UserDirectorySource>,
    draft: UserDraft,
    message: Option<String>,
}

impl AddUserForm {
    /// Build an empty form backed by `source`.
    pub fn new(source: Arc<dyn UserDirectorySource>) -> Self {
        Self {
            source,
            draft: UserDraft::default(),
            message: None,
        }
    }

    /// Current draft.
    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    /// Replace the draft with new field values.
    pub fn set_draft(&mut self, draft: UserDraft) {
        self.draft = draft;
    }

    /// Status message from the last submission.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Validate and submit the current draft.
    ///
    /// On success the draft is reset and the message names the created user;
    /// on port failure the draft is kept and a generic failure message is
    /// set. Invalid drafts leave the message untouched.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let new_user = match self.draft.validate() {
            Ok(new_user) => new_user,
            Err(errors) => return SubmitOutcome::Invalid(errors),
        };

        match self.source.create_user(&new_user).await {
            Ok(user) => {
                info!(user_id = %user.id(), username = user.username(), "user added");
                self.message = Some(format!("User {} added successfully!", user.username()));
                self.draft = UserDraft::default();
                SubmitOutcome::Created(user)
            }
            Err(error) => {
                warn!(error = %error, "add user failed");
                self.message = Some(ADD_USER_FAILED_MESSAGE.to_owned());
                SubmitOutcome::Failed(error)
            }
        }
    }
}
