//! [`Command`] for registering a new user.

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
    l10n::{Locale, Localize, Text},
    Service,
};

use super::Command;

/// [`Command`] for registering a new user with the data entered on the
/// registration screen, and signing them in.
#[derive(Clone, Debug)]
pub struct SignUp {
    /// Entered display name.
    pub name: String,

    /// Entered email.
    pub email: String,

    /// Entered password.
    pub password: SecretString,

    /// Entered password confirmation.
    pub confirmation: SecretString,
}

impl<Idp, Docs, Store> Command<SignUp> for Service<Idp, Docs, Store>
where
    Idp: Identity<
        identity::SignUp,
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

    async fn execute(&self, cmd: SignUp) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SignUp {
            name,
            email,
            password,
            confirmation,
        } = cmd;

        let (name, email) = (name.trim(), email.trim());
        let (password, confirmation) =
            (password.expose_secret(), confirmation.expose_secret());
        if name.is_empty()
            || email.is_empty()
            || password.is_empty()
            || confirmation.is_empty()
        {
            return Err(tracerr::new!(E::EmptyFields));
        }
        if password != confirmation {
            return Err(tracerr::new!(E::PasswordMismatch));
        }
        let password = user::Password::new(password)
            .filter(user::Password::is_strong)
            .ok_or_else(|| tracerr::new!(E::PasswordTooShort))?;
        let email = user::Email::new(email)
            .ok_or_else(|| tracerr::new!(E::InvalidEmail))?;
        let name = user::Name::new(name)
            .ok_or_else(|| tracerr::new!(E::InvalidName))?;

        let mut session = self
            .identity()
            .execute(identity::SignUp {
                email,
                password: SecretBox::new(Box::new(password)),
                display_name: name.clone(),
            })
            .await
            .map_err(|e| match e.as_ref() {
                identity::Error::EmailAlreadyInUse => {
                    tracerr::new!(E::EmailAlreadyInUse)
                }
                identity::Error::InvalidEmail => {
                    tracerr::new!(E::InvalidEmail)
                }
                identity::Error::WeakPassword => {
                    tracerr::new!(E::PasswordTooShort)
                }
                identity::Error::InvalidCredentials
                | identity::Error::Unavailable(_) => tracerr::map_from(e),
            })?;
        log::info!("user `{}` signed up", session.user_id);

        // The entered name is authoritative even if the provider hasn't
        // propagated it to the `Session` yet.
        session.display_name = Some(name);
        if let Err(e) = self.mirror_session(&session).await {
            log::warn!("failed to mirror `Session` locally: {e}");
        }

        Ok(session)
    }
}

/// Error of [`SignUp`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Not every field is entered.
    #[display("All fields must be filled")]
    EmptyFields,

    /// Password and its confirmation differ.
    #[display("Password confirmation doesn't match")]
    PasswordMismatch,

    /// Password is shorter than [`user::Password::MIN_LEN`].
    #[display("Password is too short")]
    PasswordTooShort,

    /// Entered email is malformed.
    #[display("Malformed email")]
    InvalidEmail,

    /// Entered display name is not a valid [`user::Name`].
    #[display("Invalid user name")]
    InvalidName,

    /// Entered email is registered already.
    #[display("Email is already registered")]
    EmailAlreadyInUse,

    /// [`Identity`] provider error.
    #[display("`Identity` operation failed: {_0}")]
    #[from]
    Identity(identity::Error),
}

impl Localize for ExecutionError {
    fn localize(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::EmptyFields, Locale::En) => "All fields must be filled.",
            (Self::EmptyFields, Locale::Id) => "Semua field harus diisi.",
            (Self::PasswordMismatch, Locale::En) => {
                "Password and its confirmation don't match."
            }
            (Self::PasswordMismatch, Locale::Id) => {
                "Password dan konfirmasi password tidak cocok."
            }
            (Self::PasswordTooShort, Locale::En) => {
                "Password must be at least 6 characters."
            }
            (Self::PasswordTooShort, Locale::Id) => {
                "Password minimal harus 6 karakter."
            }
            (Self::InvalidEmail, Locale::En) => "Malformed email.",
            (Self::InvalidEmail, Locale::Id) => "Format email tidak valid.",
            (Self::InvalidName, Locale::En) => "Invalid user name.",
            (Self::InvalidName, Locale::Id) => "Nama pengguna tidak valid.",
            (Self::EmailAlreadyInUse, Locale::En) => {
                "This email is already registered."
            }
            (Self::EmailAlreadyInUse, Locale::Id) => {
                "Email ini sudah terdaftar."
            }
            (Self::Identity(_), _) => Text::Unexpected.localize(locale),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        Handler as _,
    };
    use secrecy::SecretString;

    use crate::{infra::local_store::Key, test_service};

    use super::{ExecutionError, SignUp};

    fn sign_up(
        name: &str,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> SignUp {
        SignUp {
            name: name.to_owned(),
            email: email.to_owned(),
            password: SecretString::from(password.to_owned()),
            confirmation: SecretString::from(confirmation.to_owned()),
        }
    }

    async fn cached(
        service: &test_service::Memory,
        key: Key,
    ) -> Option<String> {
        service
            .local_store()
            .execute(Select(By::new(key)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn mirrors_entered_name() {
        let service = test_service::new();

        let session = service
            .execute(sign_up(" Budi ", "budi@kampus.ac.id", "secret1", "secret1"))
            .await
            .unwrap();

        assert_eq!(
            cached(&service, Key::UserId).await,
            Some(session.user_id.to_string()),
        );
        assert_eq!(
            cached(&service, Key::UserEmail).await.as_deref(),
            Some("budi@kampus.ac.id"),
        );
        assert_eq!(
            cached(&service, Key::UserName).await.as_deref(),
            Some("Budi"),
        );
    }

    #[tokio::test]
    async fn validates_in_order() {
        let service = test_service::new();

        for (cmd, expected) in [
            (
                sign_up("", "budi@kampus.ac.id", "secret1", "secret1"),
                "EmptyFields",
            ),
            (
                sign_up("Budi", "budi@kampus.ac.id", "secret1", ""),
                "EmptyFields",
            ),
            (
                sign_up("Budi", "bad", "secret1", "secret2"),
                "PasswordMismatch",
            ),
            (sign_up("Budi", "bad", "12345", "12345"), "PasswordTooShort"),
            (sign_up("Budi", "bad", "secret1", "secret1"), "InvalidEmail"),
        ] {
            let err = service.execute(cmd).await.unwrap_err();
            let actual = match err.as_ref() {
                ExecutionError::EmptyFields => "EmptyFields",
                ExecutionError::PasswordMismatch => "PasswordMismatch",
                ExecutionError::PasswordTooShort => "PasswordTooShort",
                ExecutionError::InvalidEmail => "InvalidEmail",
                ExecutionError::InvalidName
                | ExecutionError::EmailAlreadyInUse
                | ExecutionError::Identity(_) => "other",
            };
            assert_eq!(actual, expected);
        }
        assert_eq!(cached(&service, Key::UserId).await, None);
    }

    #[tokio::test]
    async fn rejects_registered_email() {
        let service = test_service::new();
        _ = service
            .execute(sign_up("Budi", "budi@kampus.ac.id", "secret1", "secret1"))
            .await
            .unwrap();

        let err = service
            .execute(sign_up("Ani", "budi@kampus.ac.id", "secret2", "secret2"))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmailAlreadyInUse));
        assert_eq!(
            cached(&service, Key::UserName).await.as_deref(),
            Some("Budi"),
        );
    }
}
