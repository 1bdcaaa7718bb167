//! Domain ports.
//!
//! Outbound adapters implement these traits so the list screen can be driven
//! by HTTP in production and by fixtures or scripted doubles in tests.

mod macros;
mod user_directory_source;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use user_directory_source::MockUserDirectorySource;
pub use user_directory_source::{
    FixtureUserDirectorySource, UserDirectorySource, UserDirectorySourceError,
};
