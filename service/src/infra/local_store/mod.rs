//! [`LocalStore`] contract.

mod file;
mod memory;

use derive_more::{Display, Error as StdError, From};
use strum::AsRefStr;

#[cfg(doc)]
use common::operations::{Clear, Insert, Select};

pub use self::{file::File, memory::Memory};

/// Local persistent key-value store operation.
///
/// Implementations are expected to support:
/// - [`Select`]ing an optional value by its [`Key`];
/// - [`Insert`]ing a `(`[`Key`]`, value)` pair;
/// - [`Clear`]ing every value at once.
///
/// Writes must complete (or fail) before the returned future resolves.
pub use common::Handler as LocalStore;

/// Key of a value in a [`LocalStore`].
#[derive(AsRefStr, Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Key {
    /// ID of the signed in user.
    #[display("user.uid")]
    #[strum(serialize = "user.uid")]
    UserId,

    /// Email of the signed in user.
    #[display("user.email")]
    #[strum(serialize = "user.email")]
    UserEmail,

    /// Display name of the signed in user.
    #[display("user.name")]
    #[strum(serialize = "user.name")]
    UserName,
}

/// [`LocalStore`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to access the backing file.
    #[display("Failed to access the store file: {_0}")]
    Io(std::io::Error),

    /// Backing file contains malformed data.
    #[display("Malformed store file: {_0}")]
    Json(serde_json::Error),
}
