//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{
    command,
    infra::local_store,
    l10n::{Locale, Localize, Text},
    loader,
};
use tracerr::{Trace, Traced};

/// Error shown to the user on the console.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// Localized message of this [`Error`].
    pub message: &'static str,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,
}

impl Error {
    /// Creates a new [`Error`] representing an unexpected failure.
    #[must_use]
    pub fn unexpected(locale: Locale) -> Self {
        Self {
            message: Text::Unexpected.localize(locale),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { message, backtrace } = self;

        write!(
            f,
            "{message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`] in the provided
    /// [`Locale`].
    ///
    /// [`None`] is returned if the type cannot be shown to the user as is.
    fn try_as_error(&self, locale: Locale) -> Option<Error>;

    /// Converts the type into an [`Error`] in the provided [`Locale`].
    fn as_error(&self, locale: Locale) -> Error {
        self.try_as_error(locale)
            .unwrap_or_else(|| Error::unexpected(locale))
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self, locale: Locale) -> Option<Error> {
        let mut error = self.as_ref().try_as_error(locale)?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for command::sign_in::ExecutionError {
    fn try_as_error(&self, locale: Locale) -> Option<Error> {
        Some(Error {
            message: self.localize(locale),
            backtrace: None,
        })
    }
}

impl AsError for command::sign_up::ExecutionError {
    fn try_as_error(&self, locale: Locale) -> Option<Error> {
        Some(Error {
            message: self.localize(locale),
            backtrace: None,
        })
    }
}

impl AsError for command::sign_out::ExecutionError {
    fn try_as_error(&self, _: Locale) -> Option<Error> {
        None
    }
}

impl AsError for loader::Error {
    fn try_as_error(&self, locale: Locale) -> Option<Error> {
        match self {
            Self::Documents(_) => Some(Error {
                message: self.localize(locale),
                backtrace: None,
            }),
            Self::NotLoaded => None,
        }
    }
}

impl AsError for local_store::Error {
    fn try_as_error(&self, _: Locale) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use service::{command::sign_in, l10n::Locale, loader};

    use super::AsError as _;

    #[test]
    fn shows_localized_messages() {
        let err = tracerr::new!(sign_in::ExecutionError::WrongCredentials);

        let shown = err.as_error(Locale::Id);

        assert_eq!(shown.message, "Email atau password salah.");
        assert!(shown.backtrace.is_some());
    }

    #[test]
    fn hides_internal_failures() {
        let shown = loader::Error::NotLoaded.as_error(Locale::Id);

        assert_eq!(shown.message, "Terjadi kesalahan. Coba lagi.");
        assert!(shown.backtrace.is_none());
    }
}
