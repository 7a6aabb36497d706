//! [`Command`] definition.

pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

use common::operations::{Clear, Insert};
use tracerr::Traced;

use crate::{
    domain::Session,
    infra::{
        local_store::{self, Key},
        LocalStore,
    },
    Service,
};

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{sign_in::SignIn, sign_out::SignOut, sign_up::SignUp};

impl<Idp, Docs, Store> Service<Idp, Docs, Store>
where
    Store: LocalStore<Clear, Ok = (), Err = Traced<local_store::Error>>
        + LocalStore<
            Insert<(Key, String)>,
            Ok = (),
            Err = Traced<local_store::Error>,
        >,
{
    /// Mirrors the summary of the provided [`Session`] into the
    /// [`LocalStore`], replacing whatever was stored before.
    ///
    /// [`Key::UserId`] is written last, so its presence implies the whole
    /// summary has been written.
    pub(crate) async fn mirror_session(
        &self,
        session: &Session,
    ) -> Result<(), Traced<local_store::Error>> {
        let Session {
            user_id,
            email,
            display_name,
        } = session;

        self.local_store()
            .execute(Clear)
            .await
            .map_err(tracerr::wrap!())?;

        let entries = [
            email.as_ref().map(|e| (Key::UserEmail, e.to_string())),
            display_name.as_ref().map(|n| (Key::UserName, n.to_string())),
            Some((Key::UserId, user_id.to_string())),
        ];
        for entry in entries.into_iter().flatten() {
            self.local_store()
                .execute(Insert(entry))
                .await
                .map_err(tracerr::wrap!())?;
        }

        Ok(())
    }
}
