//! Domain primitives and screen state machines.
//!
//! Purpose: own the user-list screen's behaviour independently of any
//! transport. Records, validation and fetch bookkeeping live here; the only
//! outward dependency is the [`ports::UserDirectorySource`] port.
//!
//! Public surface:
//! - User, NewUser, Post, ResourceKind: records and the fixed set of
//!   fetchable collections.
//! - ListSynchronizer: canonical collections, fetch status and the stale
//!   response guard.
//! - SearchFilter and Debouncer: debounced, case-insensitive username search.
//! - UserListScreen and UserListHandle: the event loop composing the above.
//! - UserDetails and AddUserForm: child components.

pub mod add_user;
pub mod debounce;
pub mod details;
pub mod error;
pub mod fetch_status;
pub mod filter;
pub mod ports;
pub mod post;
pub mod resource;
pub mod search;
pub mod synchronizer;
pub mod user;
pub mod user_list;

pub use self::add_user::{ADD_USER_FAILED_MESSAGE, AddUserForm, SubmitOutcome, UserDraft};
pub use self::debounce::{DEFAULT_DEBOUNCE_WINDOW, DebounceState, DebounceTicket, Debouncer};
pub use self::details::{ChildMessage, ParentNotifier, UserDetails};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::fetch_status::FetchStatus;
pub use self::filter::filter_users;
pub use self::post::Post;
pub use self::resource::{ParseResourceKindError, ResourceKind};
pub use self::search::SearchFilter;
pub use self::synchronizer::{
    FetchCompletion, FetchTicket, FetchedRecords, ListSynchronizer, fetch_records,
};
pub use self::user::{NewUser, USERNAME_MIN, User, UserId, UserValidationError};
pub use self::user_list::{
    DebounceSleeper, TokioSleeper, UserListConfig, UserListHandle, UserListRuntime,
    UserListScreen, UserListView,
};
