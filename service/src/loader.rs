//! Paginated loading of the roster.

use std::{
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard, PoisonError},
};

use common::pagination::Order;
use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Record,
    infra::documents,
    l10n::{Locale, Localize, Text},
    query::records,
    read::record::list,
    Query,
};

/// Loader of the roster [`Record`]s page by page, in the ascending order of
/// their external keys.
///
/// At most one fetch is outstanding at a time: overlapping calls are skipped.
/// Results of fetches superseded by [`Loader::refresh()`] or
/// [`Loader::detach()`] are discarded.
#[derive(Debug)]
pub struct Loader<S> {
    /// [`Service`] to query [`Record`]s with.
    ///
    /// [`Service`]: crate::Service
    service: S,

    /// Number of [`Record`]s fetched per page.
    page_size: NonZeroUsize,

    /// Current state of this [`Loader`].
    inner: Mutex<Inner>,
}

/// Mutable state of a [`Loader`].
#[derive(Debug, Default)]
struct Inner {
    /// [`Record`]s loaded so far.
    records: Vec<Record>,

    /// [`list::Cursor`] of the last loaded [`Record`].
    cursor: Option<list::Cursor>,

    /// Indicator whether every [`Record`] has been loaded.
    exhausted: bool,

    /// Indicator whether the first page has been loaded.
    loaded: bool,

    /// Indicator whether a fetch is outstanding.
    in_flight: bool,

    /// Generation of fetches whose results are still accepted.
    generation: u64,
}

/// Snapshot of a [`Loader`] state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct State {
    /// [`Record`]s loaded so far.
    pub records: Vec<Record>,

    /// Indicator whether every [`Record`] has been loaded.
    pub exhausted: bool,

    /// Indicator whether a fetch is outstanding.
    pub loading: bool,
}

impl State {
    /// Indicates whether the roster is known to contain no [`Record`]s at
    /// all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exhausted && self.records.is_empty()
    }

    /// Returns the status line to show under the loaded [`Record`]s, if
    /// any.
    #[must_use]
    pub fn footer(&self) -> Option<Text> {
        if self.loading {
            Some(Text::Loading)
        } else if self.is_empty() {
            Some(Text::Empty)
        } else if self.exhausted {
            Some(Text::AllLoaded)
        } else {
            None
        }
    }
}

/// Outcome of a [`Loader`] operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Page has been fetched and applied.
    Loaded {
        /// Number of fetched [`Record`]s.
        fetched: usize,

        /// Indicator whether the fetched page was the last one.
        exhausted: bool,
    },

    /// Nothing has been fetched.
    Skipped(Skip),

    /// Fetched page has been superseded while in flight, so is thrown away.
    Discarded,
}

/// Reason of a [`Outcome::Skipped`] operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Skip {
    /// Another fetch is outstanding.
    InFlight,

    /// Every [`Record`] has been loaded already.
    Exhausted,
}

impl<S> Loader<S> {
    /// Creates a new [`Loader`] fetching pages of the provided `page_size`.
    #[must_use]
    pub fn new(service: S, page_size: NonZeroUsize) -> Self {
        Self {
            service,
            page_size,
            inner: Mutex::default(),
        }
    }

    /// Returns a snapshot of the current [`State`].
    #[must_use]
    pub fn state(&self) -> State {
        let inner = self.inner();
        State {
            records: inner.records.clone(),
            exhausted: inner.exhausted,
            loading: inner.in_flight,
        }
    }

    /// Detaches this [`Loader`] from its screen: the outstanding fetch, if
    /// any, is discarded once it completes.
    pub fn detach(&self) {
        let mut inner = self.inner();
        inner.generation += 1;
        inner.in_flight = false;
    }

    /// Locks the [`Inner`] state of this [`Loader`].
    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> Loader<S>
where
    S: Query<records::List, Ok = list::Page, Err = Traced<documents::Error>>,
{
    /// Loads the first page, replacing whatever has been loaded before.
    ///
    /// # Errors
    ///
    /// If the page cannot be fetched. The previous [`State`] is kept then.
    pub async fn load_initial(&self) -> Result<Outcome, Traced<Error>> {
        let generation = {
            let mut inner = self.inner();
            inner.generation += 1;
            inner.in_flight = true;
            inner.generation
        };

        let page = self.fetch(None).await;

        let mut inner = self.inner();
        if inner.generation != generation {
            log::debug!("discarding superseded first page");
            return Ok(Outcome::Discarded);
        }
        inner.in_flight = false;
        let page = page.map_err(tracerr::map_from_and_wrap!(=> Error))?;

        let fetched = page.len();
        let exhausted = fetched < self.page_size.get();
        inner.cursor = page.page_info().end_cursor;
        inner.records = page.into_nodes().collect();
        inner.exhausted = exhausted;
        inner.loaded = true;

        Ok(Outcome::Loaded { fetched, exhausted })
    }

    /// Loads the page following the last loaded [`Record`] and appends it.
    ///
    /// Skipped while another fetch is outstanding, or once every [`Record`]
    /// has been loaded.
    ///
    /// # Errors
    ///
    /// - If the first page hasn't been loaded yet.
    /// - If the page cannot be fetched. The previous [`State`] is kept then.
    pub async fn load_more(&self) -> Result<Outcome, Traced<Error>> {
        let (generation, cursor) = {
            let mut inner = self.inner();
            if inner.in_flight {
                return Ok(Outcome::Skipped(Skip::InFlight));
            }
            if !inner.loaded {
                return Err(tracerr::new!(Error::NotLoaded));
            }
            if inner.exhausted {
                return Ok(Outcome::Skipped(Skip::Exhausted));
            }
            inner.in_flight = true;
            (inner.generation, inner.cursor.clone())
        };

        let page = self.fetch(cursor).await;

        let mut inner = self.inner();
        if inner.generation != generation {
            log::debug!("discarding superseded page");
            return Ok(Outcome::Discarded);
        }
        inner.in_flight = false;
        let page = page.map_err(tracerr::map_from_and_wrap!(=> Error))?;

        let fetched = page.len();
        let exhausted = fetched < self.page_size.get();
        if let Some(cursor) = page.page_info().end_cursor {
            inner.cursor = Some(cursor);
        }
        inner.records.extend(page.into_nodes());
        inner.exhausted = exhausted;

        Ok(Outcome::Loaded { fetched, exhausted })
    }

    /// Discards everything loaded so far, and loads the first page again.
    ///
    /// Supersedes the outstanding fetch, if any.
    ///
    /// # Errors
    ///
    /// If the page cannot be fetched.
    pub async fn refresh(&self) -> Result<Outcome, Traced<Error>> {
        {
            let mut inner = self.inner();
            inner.records.clear();
            inner.cursor = None;
            inner.exhausted = false;
            inner.loaded = false;
        }
        self.load_initial().await.map_err(tracerr::wrap!())
    }

    /// Fetches the page following the provided `cursor`.
    async fn fetch(
        &self,
        cursor: Option<list::Cursor>,
    ) -> Result<list::Page, Traced<documents::Error>> {
        self.service
            .execute(records::List::by(list::Selector {
                arguments: list::Arguments::after(self.page_size.get(), cursor),
                order: Order::Ascending,
            }))
            .await
    }
}

/// [`Loader`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// More [`Record`]s are requested before the first page is loaded.
    #[display("First page is not loaded yet")]
    NotLoaded,

    /// [`Documents`] source failed.
    ///
    /// [`Documents`]: crate::infra::Documents
    #[display("`Documents` operation failed: {_0}")]
    #[from]
    Documents(documents::Error),
}

impl Localize for Error {
    fn localize(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::NotLoaded, _) => Text::Unexpected.localize(locale),
            (Self::Documents(_), Locale::En) => "Failed to fetch data.",
            (Self::Documents(_), Locale::Id) => "Gagal mengambil data.",
        }
    }
}
