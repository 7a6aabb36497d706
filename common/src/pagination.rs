//! Abstractions for forward cursor pagination.

/// Generic pagination connection.
#[derive(Clone, Debug)]
pub struct Connection<C, I> {
    /// [`Edge`]s in this [`Connection`].
    pub edges: Vec<Edge<C, I>>,

    /// Maximum number of [`Edge`]s requested for this [`Connection`].
    pub limit: usize,
}

/// A page in a [`Connection`].
pub type Page<C, I> = Connection<C, I>;

impl<C, I> Connection<C, I> {
    /// Creates a new [`Connection`] from the provided [`Edge`]s.
    ///
    /// [`Edge`]s exceeding the requested limit are dropped.
    #[must_use]
    pub fn new(
        args: &Arguments<C>,
        edges: impl IntoIterator<Item = impl Into<Edge<C, I>>>,
    ) -> Self {
        Self {
            edges: edges
                .into_iter()
                .take(args.limit())
                .map(Into::into)
                .collect::<Vec<_>>(),
            limit: args.limit(),
        }
    }

    /// Returns the number of [`Edge`]s in this [`Connection`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Indicates whether this [`Connection`] contains no [`Edge`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns [`PageInfo`] of this [`Connection`].
    ///
    /// A [`Connection`] filled up to its limit is assumed to have a next
    /// page, since only a short (or empty) page proves the end of data.
    #[must_use]
    pub fn page_info(&self) -> PageInfo<C>
    where
        C: Clone,
    {
        PageInfo {
            end_cursor: self.edges.last().map(|e| e.cursor.clone()),
            has_next_page: self.limit > 0 && self.edges.len() >= self.limit,
        }
    }

    /// Consumes this [`Connection`] returning its nodes in order.
    pub fn into_nodes(self) -> impl Iterator<Item = I> {
        self.edges.into_iter().map(|e| e.node)
    }
}

/// Information about a page in a [`Connection`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageInfo<C> {
    /// Last cursor on this page.
    pub end_cursor: Option<C>,

    /// Indicator whether [`Connection`] may have a next page.
    pub has_next_page: bool,
}

/// An edge in a [`Connection`].
#[derive(Clone, Copy, Debug)]
pub struct Edge<C, I> {
    /// Cursor of this [`Edge`].
    pub cursor: C,

    /// Node of this [`Edge`].
    pub node: I,
}

impl<C, I> From<(C, I)> for Edge<C, I> {
    fn from((cursor, node): (C, I)) -> Self {
        Self { cursor, node }
    }
}

/// Forward pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments<C> {
    /// Number of items to return.
    pub first: usize,

    /// Cursor after which to return items.
    pub after: Option<C>,
}

impl<C> Arguments<C> {
    /// Creates new [`Arguments`] requesting the first page.
    #[must_use]
    pub fn first(first: usize) -> Self {
        Self { first, after: None }
    }

    /// Creates new [`Arguments`] requesting the page after the provided
    /// `cursor`.
    ///
    /// [`None`] cursor requests the first page.
    #[must_use]
    pub fn after(first: usize, cursor: Option<C>) -> Self {
        Self {
            first,
            after: cursor,
        }
    }

    /// Returns cursor requested by these [`Arguments`].
    #[must_use]
    pub fn cursor(&self) -> Option<&C> {
        self.after.as_ref()
    }

    /// Returns limit requested by these [`Arguments`].
    #[must_use]
    pub fn limit(&self) -> usize {
        self.first
    }
}

/// Pagination selector.
#[derive(Clone, Copy, Debug)]
pub struct Selector<C> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments<C>,

    /// [`Order`] of the selected items.
    pub order: Order,
}

/// Order of pagination.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Order {
    /// Ascending order.
    #[default]
    Ascending,

    /// Descending order.
    Descending,
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($cursor:ty, $node:ty) => {
        #[doc = "Edge of a [`Connection`]."]
        pub type Edge = $crate::pagination::Edge<$cursor, $node>;

        #[doc = "A [`Connection`] of [`$node`]s."]
        pub type Connection = $crate::pagination::Connection<$cursor, $node>;

        #[doc = "A [`Page`] of [`$node`]s."]
        pub type Page = $crate::pagination::Page<$cursor, $node>;

        #[doc = "An information about a [`Page`]."]
        pub type PageInfo = $crate::pagination::PageInfo<$cursor>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments<$cursor>;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$cursor>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Connection, PageInfo};

    #[test]
    fn truncates_edges_to_limit() {
        let page = Connection::<u32, char>::new(
            &Arguments::first(2),
            [(1_u32, 'a'), (2, 'b'), (3, 'c')],
        );

        assert_eq!(page.len(), 2);
        assert_eq!(page.into_nodes().collect::<String>(), "ab");
    }

    #[test]
    fn full_page_may_have_next() {
        let page = Connection::<u32, char>::new(
            &Arguments::after(2, Some(7_u32)),
            [(8_u32, 'a'), (9, 'b')],
        );

        assert_eq!(
            page.page_info(),
            PageInfo {
                end_cursor: Some(9),
                has_next_page: true,
            },
        );
    }

    #[test]
    fn short_page_is_last() {
        let page =
            Connection::<u32, char>::new(&Arguments::first(3), [(1_u32, 'a')]);

        assert_eq!(
            page.page_info(),
            PageInfo {
                end_cursor: Some(1),
                has_next_page: false,
            },
        );
    }

    #[test]
    fn empty_page_has_no_cursor() {
        let page = Connection::<u32, char>::new(
            &Arguments::first(3),
            Vec::<(u32, char)>::new(),
        );

        assert!(page.is_empty());
        assert_eq!(
            page.page_info(),
            PageInfo {
                end_cursor: None,
                has_next_page: false,
            },
        );
    }

    #[test]
    fn zero_limit_never_has_next() {
        let page =
            Connection::<u32, char>::new(&Arguments::first(0), [(1_u32, 'a')]);

        assert!(page.is_empty());
        assert!(!page.page_info().has_next_page);
    }
}
