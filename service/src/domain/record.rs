//! [`Record`] definitions.

use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::infra::Documents;

/// Roster entry of the remote collection.
///
/// Immutable from the client's perspective: [`Record`]s are created and
/// mutated only by the administrative side of the [`Documents`] source.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Record {
    /// ID of this [`Record`], assigned by the [`Documents`] source.
    #[serde(default)]
    pub id: Id,

    /// [`Name`] of this [`Record`].
    #[serde(alias = "nama")]
    pub name: Name,

    /// [`ExternalKey`] of this [`Record`].
    #[serde(alias = "nim")]
    pub external_key: ExternalKey,

    /// [`Category`] of this [`Record`], if any.
    #[serde(alias = "jurusan", default)]
    pub category: Option<Category>,
}

/// ID of a [`Record`].
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str, String)]
#[from(&str, String)]
#[serde(transparent)]
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

/// Name of a [`Record`].
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Returns the uppercased first letter of this [`Name`], used as an
    /// avatar placeholder.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.0.chars().next().map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Sort key of a [`Record`], unique per collection.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str, String)]
#[from(&str, String)]
#[serde(transparent)]
pub struct ExternalKey(String);

/// Category a [`Record`] belongs to.
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, From, PartialEq, Serialize,
)]
#[as_ref(str, String)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Category(String);

#[cfg(test)]
mod spec {
    use super::{Name, Record};

    #[test]
    fn deserializes_original_field_names() {
        let record: Record = serde_json::from_str(
            r#"{"id": "d1", "nama": "Budi", "nim": "2201", "jurusan": "TI"}"#,
        )
        .unwrap();

        assert_eq!(record.id.to_string(), "d1");
        assert_eq!(record.name.to_string(), "Budi");
        assert_eq!(record.external_key.to_string(), "2201");
        assert_eq!(record.category.unwrap().to_string(), "TI");
    }

    #[test]
    fn assigns_missing_id() {
        let a: Record =
            serde_json::from_str(r#"{"name": "Ani", "external_key": "1"}"#)
                .unwrap();
        let b: Record =
            serde_json::from_str(r#"{"name": "Ani", "external_key": "1"}"#)
                .unwrap();

        assert!(a.category.is_none());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn initial() {
        assert_eq!(Name::from("budi").initial(), Some('B'));
        assert_eq!(Name::from("").initial(), None);
    }
}
