//! [`Record`] read model definition.
//!
//! [`Record`]: crate::domain::Record

pub mod list {
    //! [`Record`]s list definitions.

    use common::{define_pagination, pagination::Order};

    use crate::domain::{record, Record};

    define_pagination!(Cursor, Node);

    /// Node in a [`Connection`].
    pub type Node = Record;

    /// Cursor pointing to a specific [`Record`] in a list.
    ///
    /// Opaque for its consumers: only the source issuing it interprets it,
    /// and only under the [`Order`] it was issued for.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub struct Cursor {
        /// [`record::ExternalKey`] of the [`Record`] this [`Cursor`] points
        /// to.
        key: record::ExternalKey,

        /// [`Order`] this [`Cursor`] was issued under.
        order: Order,
    }

    impl Cursor {
        /// Creates a new [`Cursor`] pointing to the provided [`Record`] in
        /// the provided [`Order`].
        #[must_use]
        pub fn new(record: &Record, order: Order) -> Self {
            Self {
                key: record.external_key.clone(),
                order,
            }
        }

        /// Returns [`record::ExternalKey`] this [`Cursor`] points to.
        #[must_use]
        pub fn key(&self) -> &record::ExternalKey {
            &self.key
        }

        /// Returns [`Order`] this [`Cursor`] was issued under.
        #[must_use]
        pub fn order(&self) -> Order {
            self.order
        }
    }
}
