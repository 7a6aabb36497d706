//! [`Command`] for signing out the current user.

use common::operations::Clear;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    infra::{identity, local_store, Identity, LocalStore},
    l10n::{Locale, Localize, Text},
    Service,
};

use super::Command;

/// [`Command`] for signing out the current user.
///
/// The local session summary is cleared even if the [`Identity`] provider
/// fails to sign out.
#[derive(Clone, Copy, Debug)]
pub struct SignOut;

impl<Idp, Docs, Store> Command<SignOut> for Service<Idp, Docs, Store>
where
    Idp: Identity<identity::SignOut, Ok = (), Err = Traced<identity::Error>>,
    Store: LocalStore<Clear, Ok = (), Err = Traced<local_store::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: SignOut) -> Result<Self::Ok, Self::Err> {
        let signed_out = self.identity().execute(identity::SignOut).await;
        if let Err(e) = &signed_out {
            log::error!("`Identity` failed to sign out: {e}");
        }

        self.local_store()
            .execute(Clear)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        log::info!("signed out");

        signed_out.map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
    }
}

/// Error of [`SignOut`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Identity`] provider error.
    #[display("`Identity` operation failed: {_0}")]
    Identity(identity::Error),

    /// [`LocalStore`] error.
    #[display("`LocalStore` operation failed: {_0}")]
    LocalStore(local_store::Error),
}

impl Localize for ExecutionError {
    fn localize(&self, locale: Locale) -> &'static str {
        Text::Unexpected.localize(locale)
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Handler as _,
    };

    use crate::{infra::local_store::Key, test_service};

    use super::{ExecutionError, SignOut};

    #[tokio::test]
    async fn clears_local_session() {
        let service = test_service::new();
        service
            .local_store()
            .execute(Insert((Key::UserId, "u1".to_owned())))
            .await
            .unwrap();

        service.execute(SignOut).await.unwrap();

        let cached = service
            .local_store()
            .execute(Select(By::new(Key::UserId)))
            .await
            .unwrap();
        assert_eq!(cached, None);
    }

    #[tokio::test]
    async fn clears_local_session_even_if_provider_fails() {
        let service = test_service::new();
        service
            .local_store()
            .execute(Insert((Key::UserId, "u1".to_owned())))
            .await
            .unwrap();
        service.identity().set_unavailable(true);

        let err = service.execute(SignOut).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::Identity(_)));

        let cached = service
            .local_store()
            .execute(Select(By::new(Key::UserId)))
            .await
            .unwrap();
        assert_eq!(cached, None);
    }
}
