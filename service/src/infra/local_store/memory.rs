//! In-memory [`LocalStore`].

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use common::operations::{By, Clear, Insert, Select};
use tracerr::Traced;

use crate::infra::{
    local_store::{self, Key},
    LocalStore,
};

/// In-memory [`LocalStore`], for tests and for clients without a writable
/// disk.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Mutex<HashMap<Key, String>>>);

impl Memory {
    /// Creates a new empty [`Memory`] store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore<Select<By<Option<String>, Key>>> for Memory {
    type Ok = Option<String>;
    type Err = Traced<local_store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(by.inner())
            .cloned())
    }
}

impl LocalStore<Insert<(Key, String)>> for Memory {
    type Ok = ();
    type Err = Traced<local_store::Error>;

    async fn execute(
        &self,
        Insert((key, value)): Insert<(Key, String)>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key, value),
        );
        Ok(())
    }
}

impl LocalStore<Clear> for Memory {
    type Ok = ();
    type Err = Traced<local_store::Error>;

    async fn execute(&self, _: Clear) -> Result<Self::Ok, Self::Err> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }
}
