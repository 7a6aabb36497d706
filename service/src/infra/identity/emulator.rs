//! In-process [`Identity`] provider.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use common::operations::{By, Select, Subscribe};
use secrecy::{ExposeSecret as _, SecretBox};
use tokio::sync::mpsc;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{user, Session},
    infra::{
        identity::{
            self, Changes, Current, SignIn, SignOut, SignUp, Subscription,
        },
        Identity,
    },
};

/// In-process [`Identity`] provider keeping its accounts in memory.
///
/// Behaves like a remote provider would: it owns the current [`Session`],
/// and notifies [`Subscription`]s only when that [`Session`] really changes.
#[derive(Clone, Debug, Default)]
pub struct Emulator(Arc<Mutex<State>>);

/// Inner state of an [`Emulator`].
#[derive(Debug, Default)]
struct State {
    /// Registered accounts by their email.
    accounts: HashMap<user::Email, Account>,

    /// Currently signed in [`Session`].
    current: Option<Session>,

    /// Senders of the active [`Subscription`]s.
    listeners: Vec<mpsc::UnboundedSender<Option<Session>>>,

    /// Indicator whether the provider refuses to respond.
    unavailable: bool,
}

/// Registered account.
#[derive(Debug)]
struct Account {
    /// ID of the registered user.
    id: user::Id,

    /// [`user::Password`] of the registered user.
    password: SecretBox<user::Password>,

    /// Display [`user::Name`] of the registered user.
    display_name: Option<user::Name>,
}

impl Emulator {
    /// Creates a new empty [`Emulator`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates the current [`Session`] on the provider side, as an
    /// expired or revoked token would.
    pub fn revoke(&self) {
        log::info!("revoking the current `Session`");
        self.state().set_current(None);
    }

    /// Makes this [`Emulator`] fail (or stop failing) every operation.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Locks the [`State`] of this [`Emulator`].
    fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    /// Fails if the provider is unavailable.
    fn ensure_available(&self) -> Result<(), Traced<identity::Error>> {
        if self.unavailable {
            return Err(tracerr::new!(identity::Error::Unavailable(
                "emulator is switched off".to_owned(),
            )));
        }
        Ok(())
    }

    /// Replaces the current [`Session`], notifying listeners on change.
    fn set_current(&mut self, session: Option<Session>) {
        if self.current == session {
            return;
        }
        self.current.clone_from(&session);
        self.listeners.retain(|tx| tx.send(session.clone()).is_ok());
    }
}

impl Identity<SignIn> for Emulator {
    type Ok = Session;
    type Err = Traced<identity::Error>;

    async fn execute(&self, op: SignIn) -> Result<Self::Ok, Self::Err> {
        let SignIn { email, password } = op;

        let mut state = self.state();
        state.ensure_available().map_err(tracerr::wrap!())?;

        let account = state
            .accounts
            .get(&email)
            .filter(|acc| {
                acc.password.expose_secret() == password.expose_secret()
            })
            .ok_or_else(|| tracerr::new!(identity::Error::InvalidCredentials))?;

        let session = Session {
            user_id: account.id.clone(),
            email: Some(email),
            display_name: account.display_name.clone(),
        };
        state.set_current(Some(session.clone()));

        Ok(session)
    }
}

impl Identity<SignUp> for Emulator {
    type Ok = Session;
    type Err = Traced<identity::Error>;

    async fn execute(&self, op: SignUp) -> Result<Self::Ok, Self::Err> {
        let SignUp {
            email,
            password,
            display_name,
        } = op;

        let mut state = self.state();
        state.ensure_available().map_err(tracerr::wrap!())?;

        if state.accounts.contains_key(&email) {
            return Err(tracerr::new!(identity::Error::EmailAlreadyInUse));
        }
        if !password.expose_secret().is_strong() {
            return Err(tracerr::new!(identity::Error::WeakPassword));
        }

        let id = user::Id::new();
        drop(state.accounts.insert(
            email.clone(),
            Account {
                id: id.clone(),
                password,
                display_name: Some(display_name.clone()),
            },
        ));

        let session = Session {
            user_id: id,
            email: Some(email),
            display_name: Some(display_name),
        };
        state.set_current(Some(session.clone()));

        Ok(session)
    }
}

impl Identity<SignOut> for Emulator {
    type Ok = ();
    type Err = Traced<identity::Error>;

    async fn execute(&self, _: SignOut) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        state.ensure_available().map_err(tracerr::wrap!())?;

        state.set_current(None);
        Ok(())
    }
}

impl Identity<Select<By<Option<Session>, Current>>> for Emulator {
    type Ok = Option<Session>;
    type Err = Traced<identity::Error>;

    async fn execute(
        &self,
        _: Select<By<Option<Session>, Current>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.state();
        state.ensure_available().map_err(tracerr::wrap!())?;

        Ok(state.current.clone())
    }
}

impl Identity<Subscribe<Changes>> for Emulator {
    type Ok = Subscription;
    type Err = Traced<identity::Error>;

    async fn execute(
        &self,
        _: Subscribe<Changes>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state();
        state.ensure_available().map_err(tracerr::wrap!())?;

        let (tx, rx) = mpsc::unbounded_channel();
        state.listeners.push(tx);
        Ok(Subscription::new(rx))
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select, Subscribe},
        Handler as _,
    };
    use secrecy::SecretBox;

    use crate::{
        domain::user,
        infra::identity::{
            self, Changes, Current, SignIn, SignOut, SignUp,
        },
    };

    use super::Emulator;

    fn sign_up(email: &str, password: &str) -> SignUp {
        SignUp {
            email: user::Email::new(email).unwrap(),
            password: SecretBox::new(Box::new(
                user::Password::new(password).unwrap(),
            )),
            display_name: user::Name::new("Budi").unwrap(),
        }
    }

    fn sign_in(email: &str, password: &str) -> SignIn {
        SignIn {
            email: user::Email::new(email).unwrap(),
            password: SecretBox::new(Box::new(
                user::Password::new(password).unwrap(),
            )),
        }
    }

    #[tokio::test]
    async fn signs_up_and_in() {
        let idp = Emulator::new();

        let created = idp.execute(sign_up("budi@a.id", "secret1")).await.unwrap();
        assert_eq!(
            created.display_name.as_ref().map(ToString::to_string).as_deref(),
            Some("Budi"),
        );

        idp.execute(SignOut).await.unwrap();
        let current = idp
            .execute(Select(By::<Option<_>, _>::new(Current)))
            .await
            .unwrap();
        assert!(current.is_none());

        let session = idp.execute(sign_in("budi@a.id", "secret1")).await.unwrap();
        assert_eq!(session, created);
    }

    #[tokio::test]
    async fn rejects_bad_credentials() {
        let idp = Emulator::new();
        _ = idp.execute(sign_up("budi@a.id", "secret1")).await.unwrap();

        let err = idp
            .execute(sign_in("budi@a.id", "wrong!!"))
            .await
            .unwrap_err();
        assert_eq!(*err.as_ref(), identity::Error::InvalidCredentials);

        let err = idp
            .execute(sign_in("nobody@a.id", "secret1"))
            .await
            .unwrap_err();
        assert_eq!(*err.as_ref(), identity::Error::InvalidCredentials);
    }

    #[tokio::test]
    async fn rejects_duplicate_and_weak_registrations() {
        let idp = Emulator::new();
        _ = idp.execute(sign_up("budi@a.id", "secret1")).await.unwrap();

        let err = idp
            .execute(sign_up("budi@a.id", "secret2"))
            .await
            .unwrap_err();
        assert_eq!(*err.as_ref(), identity::Error::EmailAlreadyInUse);

        let err = idp.execute(sign_up("ani@a.id", "123")).await.unwrap_err();
        assert_eq!(*err.as_ref(), identity::Error::WeakPassword);
    }

    #[tokio::test]
    async fn notifies_only_on_change() {
        let idp = Emulator::new();
        let mut sub = idp.execute(Subscribe(Changes)).await.unwrap();

        let session = idp.execute(sign_up("budi@a.id", "secret1")).await.unwrap();
        _ = idp.execute(sign_in("budi@a.id", "secret1")).await.unwrap();
        idp.revoke();
        idp.revoke();

        assert_eq!(sub.next().await, Some(Some(session)));
        assert_eq!(sub.next().await, Some(None));

        sub.unsubscribe();
        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn fails_while_unavailable() {
        let idp = Emulator::new();
        idp.set_unavailable(true);

        let err = idp
            .execute(Select(By::<Option<_>, _>::new(Current)))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), identity::Error::Unavailable(_)));

        idp.set_unavailable(false);
        assert!(idp
            .execute(Select(By::<Option<_>, _>::new(Current)))
            .await
            .is_ok());
    }
}
