//! [`Identity`] provider contract.

mod emulator;

use derive_more::{Display, Error as StdError};
use secrecy::SecretBox;
use tokio::sync::mpsc;

use crate::domain::{user, Session};
#[cfg(doc)]
use common::operations::{Select, Subscribe};

pub use self::emulator::Emulator;

/// Identity provider operation.
///
/// Implementations are expected to support:
/// - [`SignIn`] and [`SignUp`], returning the created [`Session`];
/// - [`SignOut`];
/// - [`Select`]ing the [`Current`] [`Session`] snapshot without a network
///   round-trip;
/// - [`Subscribe`]ing to [`Changes`] of the current [`Session`].
pub use common::Handler as Identity;

/// Operation of signing in with email and password.
#[derive(Clone, Debug)]
pub struct SignIn {
    /// [`user::Email`] to sign in with.
    pub email: user::Email,

    /// [`user::Password`] to sign in with.
    pub password: SecretBox<user::Password>,
}

/// Operation of registering a new user and signing them in.
#[derive(Clone, Debug)]
pub struct SignUp {
    /// [`user::Email`] to register.
    pub email: user::Email,

    /// [`user::Password`] to register with.
    pub password: SecretBox<user::Password>,

    /// Display [`user::Name`] of the new user.
    pub display_name: user::Name,
}

/// Operation of signing out the current user.
#[derive(Clone, Copy, Debug)]
pub struct SignOut;

/// Selector of the current [`Session`].
#[derive(Clone, Copy, Debug)]
pub struct Current;

/// Marker of the current [`Session`] changes stream.
#[derive(Clone, Copy, Debug)]
pub struct Changes;

/// Cancellable subscription to the current [`Session`] changes.
///
/// Each received item is the new current [`Session`], or [`None`] once
/// signed out. Dropping the [`Subscription`] unsubscribes as well.
#[derive(Debug)]
pub struct Subscription {
    /// Receiving side of the changes channel.
    changes: mpsc::UnboundedReceiver<Option<Session>>,
}

impl Subscription {
    /// Creates a new [`Subscription`] receiving from the provided channel.
    #[must_use]
    pub fn new(changes: mpsc::UnboundedReceiver<Option<Session>>) -> Self {
        Self { changes }
    }

    /// Waits for the next change of the current [`Session`].
    ///
    /// [`None`] is returned once the provider has gone or this
    /// [`Subscription`] has been cancelled.
    pub async fn next(&mut self) -> Option<Option<Session>> {
        self.changes.recv().await
    }

    /// Cancels this [`Subscription`].
    ///
    /// Changes already delivered are still drained by [`Subscription::next`].
    pub fn unsubscribe(&mut self) {
        self.changes.close();
    }
}

/// [`Identity`] provider error.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Provided credentials don't match any user.
    #[display("Invalid credentials")]
    InvalidCredentials,

    /// Provided email is registered already.
    #[display("Email is already in use")]
    EmailAlreadyInUse,

    /// Provided email is malformed.
    #[display("Malformed email")]
    InvalidEmail,

    /// Provided password is rejected as too weak.
    #[display("Password is too weak")]
    WeakPassword,

    /// Provider cannot be reached or failed internally.
    #[display("Identity provider is unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}
