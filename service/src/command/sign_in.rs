//! [`Command`] for signing in an existing user.

use common::operations::{Clear, Insert};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret as _, SecretBox, SecretString};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{user, Session},
    infra::{
        identity,
        local_store::{self, Key},
        Identity, LocalStore,
    },
    l10n::{Locale, Localize},
    Service,
};

use super::Command;

/// [`Command`] for signing in an existing user with the credentials entered
/// on the login screen.
#[derive(Clone, Debug)]
pub struct SignIn {
    /// Entered email.
    pub email: String,

    /// Entered password.
    pub password: SecretString,
}

impl<Idp, Docs, Store> Command<SignIn> for Service<Idp, Docs, Store>
where
    Idp: Identity<
        identity::SignIn,
        Ok = Session,
        Err = Traced<identity::Error>,
    >,
    Store: LocalStore<Clear, Ok = (), Err = Traced<local_store::Error>>
        + LocalStore<
            Insert<(Key, String)>,
            Ok = (),
            Err = Traced<local_store::Error>,
        >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SignIn) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SignIn { email, password } = cmd;

        let email = email.trim();
        let password = password.expose_secret();
        if email.is_empty() || password.is_empty() {
            return Err(tracerr::new!(E::EmptyFields));
        }

        // Malformed input can't match any account.
        let email = user::Email::new(email)
            .ok_or_else(|| tracerr::new!(E::WrongCredentials))?;
        let password = user::Password::new(password)
            .ok_or_else(|| tracerr::new!(E::WrongCredentials))?;

        let session = self
            .identity()
            .execute(identity::SignIn {
                email,
                password: SecretBox::new(Box::new(password)),
            })
            .await
            .map_err(|e| match e.as_ref() {
                identity::Error::InvalidCredentials
                | identity::Error::InvalidEmail => {
                    tracerr::new!(E::WrongCredentials)
                }
                identity::Error::EmailAlreadyInUse
                | identity::Error::WeakPassword
                | identity::Error::Unavailable(_) => tracerr::map_from(e),
            })?;
        log::info!("user `{}` signed in", session.user_id);

        if let Err(e) = self.mirror_session(&session).await {
            log::warn!("failed to mirror `Session` locally: {e}");
        }

        Ok(session)
    }
}

/// Error of [`SignIn`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Email or password is not entered.
    #[display("Email and password must not be empty")]
    EmptyFields,

    /// Entered credentials don't match any user.
    #[display("Wrong user credentials")]
    WrongCredentials,

    /// [`Identity`] provider error.
    #[display("`Identity` operation failed: {_0}")]
    #[from]
    Identity(identity::Error),
}

impl Localize for ExecutionError {
    fn localize(&self, locale: Locale) -> &'static str {
        use crate::l10n::Text;

        match (self, locale) {
            (Self::EmptyFields, Locale::En) => {
                "Email and password must not be empty."
            }
            (Self::EmptyFields, Locale::Id) => {
                "Email dan password tidak boleh kosong."
            }
            (Self::WrongCredentials, Locale::En) => {
                "Wrong email or password."
            }
            (Self::WrongCredentials, Locale::Id) => {
                "Email atau password salah."
            }
            (Self::Identity(_), _) => Text::Unexpected.localize(locale),
        }
    }
}
