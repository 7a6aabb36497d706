//! User definitions.
//!
//! Users live in the identity provider, so the client only knows them by the
//! fields of their [`Session`].

pub mod session;

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display, From, Into};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use uuid::Uuid;

pub use self::session::Session;

#[cfg(doc)]
use crate::infra::Identity;

/// Opaque ID of a user, assigned by the [`Identity`] provider.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Id(String);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

/// Display name of a user.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Password of a user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Password(String);

impl Password {
    /// Minimal length of a [`Password`] accepted on registration.
    pub const MIN_LEN: usize = 6;

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        !password.is_empty() && password.chars().count() <= 128
    }

    /// Indicates whether this [`Password`] is long enough to register with.
    #[must_use]
    pub fn is_strong(&self) -> bool {
        self.0.chars().count() >= Self::MIN_LEN
    }

    /// Returns this [`Password`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Email address of a user.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$")
                .expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

#[cfg(test)]
mod spec {
    use super::{Email, Name, Password};

    #[test]
    fn email_format() {
        assert!(Email::new("budi@kampus.ac.id").is_some());
        assert!(Email::new("a.b+c@example.com").is_some());

        assert!(Email::new("").is_none());
        assert!(Email::new("budi").is_none());
        assert!(Email::new("budi@kampus").is_none());
        assert!(Email::new("budi @kampus.ac.id").is_none());
        assert!(Email::new("@kampus.ac.id").is_none());
    }

    #[test]
    fn name_is_trimmed_and_non_empty() {
        assert!(Name::new("Budi").is_some());
        assert!(Name::new("Budi Santoso").is_some());

        assert!(Name::new("").is_none());
        assert!(Name::new(" Budi").is_none());
        assert!(Name::new("Budi ").is_none());
        assert!(Name::new("x".repeat(513)).is_none());
    }

    #[test]
    fn password_strength() {
        assert!(Password::new("").is_none());

        let short = Password::new("12345").unwrap();
        assert!(!short.is_strong());

        let strong = Password::new("123456").unwrap();
        assert!(strong.is_strong());
        assert_eq!(strong.as_str(), "123456");
    }
}
