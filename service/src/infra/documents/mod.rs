//! [`Documents`] source contract.

mod memory;

use derive_more::{Display, Error as StdError, From};

#[cfg(doc)]
use common::operations::Select;
#[cfg(doc)]
use crate::read::record::list::{Page, Selector};

pub use self::memory::Memory;

/// Document source operation.
///
/// Implementations are expected to support [`Select`]ing a record list
/// [`Page`] by a [`Selector`], ordered by the records' external key.
pub use common::Handler as Documents;

/// [`Documents`] source error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Source cannot be reached or failed internally.
    #[display("Document source is unavailable: {_0}")]
    #[from(ignore)]
    Unavailable(#[error(not(source))] String),

    /// Provided cursor was issued under another ordering.
    #[display("Cursor was issued under another ordering")]
    #[from(ignore)]
    CursorMismatch,

    /// Failed to read a collection file.
    #[display("Failed to read collection file: {_0}")]
    Io(std::io::Error),

    /// Failed to decode a collection file.
    #[display("Failed to decode collection file: {_0}")]
    Json(serde_json::Error),
}
