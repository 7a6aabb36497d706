//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Boxed error of a finished [`Task`].
type BoxError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s on the current thread.
///
/// Resolves once every spawned [`Task`] has finished, or as soon as any of
/// them fails.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of tasks.
    set: task::LocalSet,

    /// Names and handles of spawned tasks.
    handles: Vec<(&'static str, task::JoinHandle<Result<(), BoxError>>)>,
}

impl Background {
    /// Spawns a new [`Task`] named `name` inside the [`Background`]
    /// environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        log::debug!("spawning `{name}` task");
        self.handles.push((
            name,
            self.set.spawn_local(future.map_err(|e| BoxError::from(Box::new(e)))),
        ));
    }
}

impl IntoFuture for Background {
    type Output = Result<(), BoxError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        future::try_join_all(iter::once(set.map(Ok).boxed_local()).chain(
            handles.into_iter().map(|(name, h)| {
                h.map(move |r| {
                    let r = match r {
                        Ok(r) => r,
                        Err(e) => Err(BoxError::from(Box::new(e))),
                    };
                    match &r {
                        Ok(()) => log::info!("`{name}` task finished"),
                        Err(e) => log::error!("`{name}` task failed: {e}"),
                    }
                    r
                })
                .boxed_local()
            }),
        ))
        .map_ok(drop)
        .boxed_local()
    }
}

#[cfg(test)]
mod spec {
    use std::{fmt, io};

    use super::Background;

    #[tokio::test]
    async fn runs_spawned_tasks() {
        let (tx, rx) = tokio::sync::oneshot::channel();

        let mut background = Background::default();
        background.spawn("sender", async move {
            tx.send(42).map_err(|_| io::Error::other("receiver is gone"))
        });
        background.spawn("receiver", async move {
            assert_eq!(rx.await.ok(), Some(42));
            Ok::<_, fmt::Error>(())
        });

        background.await.unwrap();
    }

    #[tokio::test]
    async fn fails_with_spawned_task() {
        let mut background = Background::default();
        background.spawn("failing", async { Err(fmt::Error) });

        assert!(background.await.is_err());
    }
}
