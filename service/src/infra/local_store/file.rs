//! File-backed [`LocalStore`].

use std::{
    collections::BTreeMap,
    fs, io,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use common::operations::{By, Clear, Insert, Select};
use tracerr::Traced;
use tracing as log;

use crate::infra::{
    local_store::{self, Key},
    LocalStore,
};

/// [`LocalStore`] persisting its values as a JSON object in a file.
///
/// Every write replaces the whole file atomically (a temporary sibling file
/// is written and renamed over it), so a crash never leaves a partially
/// written session summary behind. The in-memory view is updated only after
/// the file has been replaced.
#[derive(Clone, Debug)]
pub struct File {
    /// Path of the backing file.
    path: Arc<PathBuf>,

    /// Values mirrored from the backing file.
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl File {
    /// Opens the [`File`] store at the provided `path`.
    ///
    /// A missing file is treated as an empty store and is not created until
    /// the first write.
    ///
    /// # Errors
    ///
    /// If the file exists but cannot be read or decoded.
    pub fn open(
        path: impl Into<PathBuf>,
    ) -> Result<Self, Traced<local_store::Error>> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(tracerr::from_and_wrap!(=> local_store::Error))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(tracerr::new!(local_store::Error::Io(e)));
            }
        };
        log::debug!("opened local store at `{}`", path.display());

        Ok(Self {
            path: Arc::new(path),
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    /// Locks the in-memory view of this [`File`] store.
    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically replaces the backing file with the provided `entries`.
    fn persist(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), Traced<local_store::Error>> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(tracerr::from_and_wrap!(=> local_store::Error))?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, bytes)
            .map_err(tracerr::from_and_wrap!(=> local_store::Error))?;
        fs::rename(&tmp, self.path.as_path())
            .map_err(tracerr::from_and_wrap!(=> local_store::Error))
    }
}

impl LocalStore<Select<By<Option<String>, Key>>> for File {
    type Ok = Option<String>;
    type Err = Traced<local_store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.entries().get(by.inner().as_ref()).cloned())
    }
}

impl LocalStore<Insert<(Key, String)>> for File {
    type Ok = ();
    type Err = Traced<local_store::Error>;

    async fn execute(
        &self,
        Insert((key, value)): Insert<(Key, String)>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut entries = self.entries();

        let mut updated = entries.clone();
        drop(updated.insert(key.as_ref().to_owned(), value));
        self.persist(&updated).map_err(tracerr::wrap!())?;

        *entries = updated;
        Ok(())
    }
}

impl LocalStore<Clear> for File {
    type Ok = ();
    type Err = Traced<local_store::Error>;

    async fn execute(&self, _: Clear) -> Result<Self::Ok, Self::Err> {
        let mut entries = self.entries();

        self.persist(&BTreeMap::new()).map_err(tracerr::wrap!())?;

        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use std::{env, fs, path::PathBuf};

    use common::{
        operations::{By, Clear, Insert, Select},
        Handler as _,
    };

    use crate::infra::local_store::{self, Key};

    use super::File;

    fn temp_path() -> PathBuf {
        env::temp_dir()
            .join(format!("roster-{}.json", uuid::Uuid::new_v4().simple()))
    }

    async fn get(store: &File, key: Key) -> Option<String> {
        store.execute(Select(By::new(key))).await.unwrap()
    }

    #[tokio::test]
    async fn persists_between_opens() {
        let path = temp_path();

        let store = File::open(&path).unwrap();
        assert_eq!(get(&store, Key::UserId).await, None);

        store
            .execute(Insert((Key::UserId, "u1".to_owned())))
            .await
            .unwrap();
        store
            .execute(Insert((Key::UserName, "Budi".to_owned())))
            .await
            .unwrap();

        let reopened = File::open(&path).unwrap();
        assert_eq!(get(&reopened, Key::UserId).await.as_deref(), Some("u1"));
        assert_eq!(
            get(&reopened, Key::UserName).await.as_deref(),
            Some("Budi"),
        );

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"user.uid\""));

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn clears_everything() {
        let path = temp_path();

        let store = File::open(&path).unwrap();
        store
            .execute(Insert((Key::UserEmail, "budi@a.id".to_owned())))
            .await
            .unwrap();
        store.execute(Clear).await.unwrap();

        assert_eq!(get(&store, Key::UserEmail).await, None);
        assert_eq!(get(&File::open(&path).unwrap(), Key::UserEmail).await, None);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn keeps_view_when_write_fails() {
        let dir = temp_path();
        fs::create_dir(&dir).unwrap();
        let store = File::open(dir.join("missing").join("store.json")).unwrap();

        let err = store
            .execute(Insert((Key::UserId, "u1".to_owned())))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), local_store::Error::Io(_)));
        assert_eq!(get(&store, Key::UserId).await, None);

        fs::remove_dir(&dir).unwrap();
    }

    #[test]
    fn rejects_malformed_file() {
        let path = temp_path();
        fs::write(&path, "not json").unwrap();

        let err = File::open(&path).unwrap_err();
        assert!(matches!(err.as_ref(), local_store::Error::Json(_)));

        fs::remove_file(&path).unwrap();
    }
}
