//! [`Query`] definition.

pub mod profile;
pub mod records;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{documents, Documents},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from [`Documents`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DocumentsQuery<T>(T);

impl<W, B> DocumentsQuery<By<W, B>> {
    /// Creates a new [`DocumentsQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Idp, Docs, Store, W, B> Query<DocumentsQuery<By<W, B>>>
    for Service<Idp, Docs, Store>
where
    Docs: Documents<Select<By<W, B>>, Ok = W, Err = Traced<documents::Error>>,
{
    type Ok = W;
    type Err = Traced<documents::Error>;

    async fn execute(
        &self,
        DocumentsQuery(by): DocumentsQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.documents()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}
