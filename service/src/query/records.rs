//! [`Query`] collection related to the multiple [`Record`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Record, Query};
use crate::read;

use super::DocumentsQuery;

/// Queries a page of [`Record`]s.
pub type List =
    DocumentsQuery<By<read::record::list::Page, read::record::list::Selector>>;
