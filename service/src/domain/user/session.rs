//! [`Session`] definitions.

use crate::domain::user;
#[cfg(doc)]
use crate::infra::{Identity, LocalStore};

/// Authenticated identity of the current user, as known to the [`Identity`]
/// provider.
///
/// A summary of it is mirrored into the [`LocalStore`], so screens may render
/// it without awaiting the provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Session {
    /// ID of the user this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`user::Email`] of the user, if the provider knows it.
    pub email: Option<user::Email>,

    /// [`user::Name`] of the user, if one has been set.
    pub display_name: Option<user::Name>,
}
