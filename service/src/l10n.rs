//! User-facing texts.

use derive_more::Display;
use serde::Deserialize;
use strum::EnumString;

/// Language of the user-facing texts.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumString, Eq, PartialEq,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(ascii_case_insensitive)]
pub enum Locale {
    /// English.
    #[default]
    #[display("en")]
    En,

    /// Indonesian.
    #[display("id")]
    Id,
}

/// Rendering of a value as a text for the user.
pub trait Localize {
    /// Returns the text of this value in the provided [`Locale`].
    fn localize(&self, locale: Locale) -> &'static str;
}

/// Fixed user-facing text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Text {
    /// Shown while the session gate is deciding.
    Loading,

    /// Shown when the roster contains no records at all.
    Empty,

    /// Shown once every record of the roster has been loaded.
    AllLoaded,

    /// Name shown for a user without a display name.
    DefaultUserName,

    /// Shown on an unexpected failure.
    Unexpected,
}

impl Localize for Text {
    fn localize(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Loading, Locale::En) => "Loading...",
            (Self::Loading, Locale::Id) => "Memuat...",
            (Self::Empty, Locale::En) => "No students yet.",
            (Self::Empty, Locale::Id) => "Tidak ada data mahasiswa.",
            (Self::AllLoaded, Locale::En) => "Everything is loaded",
            (Self::AllLoaded, Locale::Id) => "Semua data sudah dimuat",
            (Self::DefaultUserName, Locale::En) => "User",
            (Self::DefaultUserName, Locale::Id) => "Pengguna",
            (Self::Unexpected, Locale::En) => {
                "Something went wrong. Try again."
            }
            (Self::Unexpected, Locale::Id) => "Terjadi kesalahan. Coba lagi.",
        }
    }
}
