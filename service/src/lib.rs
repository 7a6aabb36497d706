//! Service contains the client-side logic of the roster application: the
//! session gate deciding where the user may navigate, and the paginated
//! loading of the roster.
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod gate;
pub mod infra;
pub mod l10n;
pub mod loader;
pub mod query;
pub mod read;
pub mod task;

use std::{num::NonZeroUsize, time::Duration};

use smart_default::SmartDefault;

#[cfg(doc)]
use infra::{Documents, Identity, LocalStore};

pub use self::{
    command::Command, gate::RestoredSession, l10n::Localize, loader::Loader,
    query::Query, task::Task,
};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Number of records fetched per page.
    #[default(NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN))]
    pub page_size: NonZeroUsize,

    /// Time the startup reconciliation may take before the gate fails
    /// closed.
    #[default(Duration::from_secs(5))]
    pub reconcile_timeout: Duration,

    /// Policy applied when the [`Identity`] provider restored a session the
    /// [`LocalStore`] knows nothing about.
    pub restored_session: RestoredSession,
}

/// Client service.
#[derive(Clone, Debug)]
pub struct Service<Idp, Docs, Store> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Identity`] provider of this [`Service`].
    identity: Idp,

    /// [`Documents`] source of this [`Service`].
    documents: Docs,

    /// [`LocalStore`] of this [`Service`].
    local_store: Store,
}

impl<Idp, Docs, Store> Service<Idp, Docs, Store> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(
        config: Config,
        identity: Idp,
        documents: Docs,
        local_store: Store,
    ) -> Self {
        Self {
            config,
            identity,
            documents,
            local_store,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Identity`] provider of this [`Service`].
    #[must_use]
    pub fn identity(&self) -> &Idp {
        &self.identity
    }

    /// Returns [`Documents`] source of this [`Service`].
    #[must_use]
    pub fn documents(&self) -> &Docs {
        &self.documents
    }

    /// Returns [`LocalStore`] of this [`Service`].
    #[must_use]
    pub fn local_store(&self) -> &Store {
        &self.local_store
    }
}

#[cfg(test)]
pub(crate) mod test_service {
    //! [`Service`] wired with in-process infrastructure for tests.

    use super::{
        infra::{documents, identity, local_store},
        Config, Service,
    };

    /// [`Service`] over in-process infrastructure.
    pub(crate) type Memory = Service<
        identity::Emulator,
        documents::Memory,
        local_store::Memory,
    >;

    /// Creates a new [`Memory`] service with the default [`Config`].
    pub(crate) fn new() -> Memory {
        with_config(Config::default())
    }

    /// Creates a new [`Memory`] service with the provided [`Config`].
    pub(crate) fn with_config(config: Config) -> Memory {
        Service::new(
            config,
            identity::Emulator::new(),
            documents::Memory::default(),
            local_store::Memory::new(),
        )
    }
}
