//! In-process [`Documents`] source.

use std::{
    fs,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};

use common::{
    operations::{By, Select},
    pagination::Order,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Record,
    infra::{documents, Documents},
    read::record::list,
};

/// In-process [`Documents`] source serving a collection of [`Record`]s.
///
/// [`Record`]s are kept sorted by their external key, which is unique: the
/// first [`Record`] wins on a duplicate.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<RwLock<Vec<Record>>>);

impl Memory {
    /// Creates a new [`Memory`] source serving the provided [`Record`]s.
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        let mut records = records.into_iter().collect::<Vec<_>>();
        records.sort_by(|a, b| a.external_key.cmp(&b.external_key));
        let total = records.len();
        records.dedup_by(|b, a| a.external_key == b.external_key);
        if records.len() < total {
            log::warn!(
                "dropped {} `Record`s with a duplicate external key",
                total - records.len(),
            );
        }
        Self(Arc::new(RwLock::new(records)))
    }

    /// Loads a new [`Memory`] source from a JSON file containing an array of
    /// [`Record`]s.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or decoded.
    pub fn from_json_file(
        path: impl AsRef<Path>,
    ) -> Result<Self, Traced<documents::Error>> {
        let bytes = fs::read(path.as_ref())
            .map_err(tracerr::from_and_wrap!(=> documents::Error))?;
        let records = serde_json::from_slice::<Vec<Record>>(&bytes)
            .map_err(tracerr::from_and_wrap!(=> documents::Error))?;
        Ok(Self::new(records))
    }

    /// Returns the number of [`Record`]s in this [`Memory`] source.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Indicates whether this [`Memory`] source has no [`Record`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Documents<Select<By<list::Page, list::Selector>>> for Memory {
    type Ok = list::Page;
    type Err = Traced<documents::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::Page, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector { arguments, order } = by.into_inner();

        let after = match arguments.cursor() {
            Some(c) if c.order() != order => {
                return Err(tracerr::new!(documents::Error::CursorMismatch));
            }
            Some(c) => Some(c.key()),
            None => None,
        };

        let records = self.0.read().unwrap_or_else(PoisonError::into_inner);
        let ordered: Box<dyn Iterator<Item = &Record>> = match order {
            Order::Ascending => Box::new(records.iter()),
            Order::Descending => Box::new(records.iter().rev()),
        };
        let edges = ordered
            .filter(|r| {
                after.map_or(true, |key| match order {
                    Order::Ascending => r.external_key > *key,
                    Order::Descending => r.external_key < *key,
                })
            })
            .take(arguments.limit())
            .map(|r| (list::Cursor::new(r, order), r.clone()))
            .collect::<Vec<_>>();

        Ok(list::Page::new(&arguments, edges))
    }
}

#[cfg(test)]
mod spec {
    use std::{env, fs};

    use common::{
        operations::{By, Select},
        pagination::Order,
        Handler as _,
    };

    use crate::{
        domain::{record, Record},
        infra::documents,
        read::record::list,
    };

    use super::Memory;

    fn record(key: &str) -> Record {
        Record {
            id: record::Id::new(),
            name: format!("Student {key}").into(),
            external_key: key.into(),
            category: None,
        }
    }

    fn keys(page: list::Page) -> Vec<String> {
        page.into_nodes()
            .map(|r| r.external_key.to_string())
            .collect()
    }

    async fn select(
        source: &Memory,
        first: usize,
        after: Option<list::Cursor>,
        order: Order,
    ) -> Result<list::Page, tracerr::Traced<documents::Error>> {
        source
            .execute(Select(By::new(list::Selector {
                arguments: list::Arguments::after(first, after),
                order,
            })))
            .await
    }

    #[tokio::test]
    async fn pages_in_key_order() {
        let source = Memory::new(["03", "01", "05", "02", "04"].map(record));

        let first = select(&source, 2, None, Order::Ascending).await.unwrap();
        let cursor = first.page_info().end_cursor;
        assert_eq!(keys(first), ["01", "02"]);

        let second =
            select(&source, 2, cursor, Order::Ascending).await.unwrap();
        let cursor = second.page_info().end_cursor;
        assert_eq!(keys(second), ["03", "04"]);

        let last = select(&source, 2, cursor, Order::Ascending).await.unwrap();
        assert!(!last.page_info().has_next_page);
        assert_eq!(keys(last), ["05"]);
    }

    #[tokio::test]
    async fn pages_in_descending_order() {
        let source = Memory::new(["01", "02", "03"].map(record));

        let first = select(&source, 2, None, Order::Descending).await.unwrap();
        let cursor = first.page_info().end_cursor;
        assert_eq!(keys(first), ["03", "02"]);

        let last =
            select(&source, 2, cursor, Order::Descending).await.unwrap();
        assert_eq!(keys(last), ["01"]);
    }

    #[tokio::test]
    async fn rejects_cursor_of_another_order() {
        let source = Memory::new(["01", "02", "03"].map(record));

        let page = select(&source, 1, None, Order::Ascending).await.unwrap();
        let cursor = page.page_info().end_cursor;

        let err = select(&source, 1, cursor, Order::Descending)
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), documents::Error::CursorMismatch));
    }

    #[test]
    fn drops_duplicate_keys() {
        let source = Memory::new(["01", "01", "02"].map(record));

        assert_eq!(source.len(), 2);
    }

    #[tokio::test]
    async fn loads_json_file() {
        let path = env::temp_dir()
            .join(format!("roster-{}.json", uuid::Uuid::new_v4().simple()));
        fs::write(
            &path,
            r#"[
                {"nama": "Budi", "nim": "2202"},
                {"nama": "Ani", "nim": "2201", "jurusan": "TI"}
            ]"#,
        )
        .unwrap();

        let source = Memory::from_json_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let page = select(&source, 10, None, Order::Ascending).await.unwrap();
        assert_eq!(keys(page), ["2201", "2202"]);
    }

    #[test]
    fn fails_on_missing_file() {
        let err = Memory::from_json_file("/definitely/not/here.json")
            .unwrap_err();

        assert!(matches!(err.as_ref(), documents::Error::Io(_)));
    }
}
