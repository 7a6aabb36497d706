//! [`SessionGate`] [`Task`].

use std::fmt;

use common::operations::{By, Clear, Insert, Select, Start, Subscribe};
use derive_more::{Display, Error, From};
use tokio::{sync::watch, time};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Session,
    gate::{self, Decision, Effect, Navigator, Redirect, Status},
    infra::{
        identity::{self, Changes, Current},
        local_store::{self, Key},
        Identity, LocalStore,
    },
    Service,
};

use super::Task;

/// [`Task`] keeping the user in the area matching their authentication
/// [`Status`].
///
/// Reconciles the locally cached session with the live one once on start,
/// and then follows every change reported by the [`Identity`] provider. Each
/// [`Status`] transition redirects exactly once.
#[derive(Debug)]
pub struct SessionGate<S, N> {
    /// [`Service`] instance.
    service: S,

    /// [`Navigator`] to redirect with.
    navigator: N,

    /// Current [`Status`].
    status: watch::Sender<Status>,
}

impl<S, N> SessionGate<S, N> {
    /// Creates a new [`SessionGate`] in the [`Status::Initializing`].
    #[must_use]
    pub fn new(service: S, navigator: N) -> Self {
        Self {
            service,
            navigator,
            status: watch::Sender::new(Status::Initializing),
        }
    }

    /// Subscribes to the [`Status`] of this [`SessionGate`].
    #[must_use]
    pub fn status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// Returns the current [`Status`] of this [`SessionGate`].
    #[must_use]
    pub fn current(&self) -> Status {
        *self.status.borrow()
    }
}

impl<Idp, Docs, Store, N> SessionGate<Service<Idp, Docs, Store>, N>
where
    Idp: Identity<
        Select<By<Option<Session>, Current>>,
        Ok = Option<Session>,
        Err = Traced<identity::Error>,
    >,
    Store: LocalStore<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<local_store::Error>,
        > + LocalStore<Clear, Ok = (), Err = Traced<local_store::Error>>
        + LocalStore<
            Insert<(Key, String)>,
            Ok = (),
            Err = Traced<local_store::Error>,
        >,
    N: Navigator<Redirect, Ok = (), Err: fmt::Display>,
{
    /// Reconciles the locally cached session with the live one reported by
    /// the [`Identity`] provider.
    ///
    /// Any failure (including exceeding the configured timeout) fails closed
    /// into the [`Status::Unauthenticated`].
    pub async fn reconcile(&self) -> Status {
        let config = self.service.config();

        let decision =
            match time::timeout(config.reconcile_timeout, self.observe()).await
            {
                Ok(Ok((cached, live))) => gate::reconcile(
                    cached.as_deref(),
                    live,
                    config.restored_session,
                ),
                Ok(Err(e)) => {
                    log::warn!("failing closed, reconciliation failed: {e}");
                    Self::fail_closed()
                }
                Err(_) => {
                    log::warn!(
                        "failing closed, reconciliation timed out after {:?}",
                        config.reconcile_timeout,
                    );
                    Self::fail_closed()
                }
            };

        self.apply(decision).await
    }

    /// Follows the change of the current [`Session`] reported by the
    /// [`Identity`] provider.
    ///
    /// Clients also confirm here the [`Session`]s their own sign in, sign up
    /// and sign out have resulted in, since the provider reports nothing
    /// when its current [`Session`] stays the same.
    pub async fn on_session_changed(&self, session: Option<Session>) -> Status {
        self.apply(gate::on_session_changed(session.as_ref())).await
    }

    /// Reads the live [`Session`] and the cached user ID.
    async fn observe(
        &self,
    ) -> Result<(Option<String>, Option<Session>), Traced<ExecutionError>>
    {
        let live = self
            .service
            .identity()
            .execute(Select(By::new(Current)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        let cached = self
            .service
            .local_store()
            .execute(Select(By::new(Key::UserId)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        Ok((cached, live))
    }

    /// [`Decision`] taken when the state cannot be observed.
    fn fail_closed() -> Decision {
        Decision {
            status: Status::Unauthenticated,
            effect: Effect::None,
        }
    }

    /// Applies the provided [`Decision`], returning the resulting [`Status`].
    async fn apply(&self, decision: Decision) -> Status {
        let Decision { status, effect } = decision;

        let applied = match effect {
            Effect::None => Ok(()),
            Effect::ClearCache => self
                .service
                .local_store()
                .execute(Clear)
                .await
                .map_err(tracerr::wrap!()),
            Effect::Mirror(session) => {
                self.service.mirror_session(&session).await
            }
        };
        if let Err(e) = applied {
            log::error!("failed to update local session: {e}");
        }

        let changed = self.status.send_if_modified(|current| {
            let changed = *current != status;
            *current = status;
            changed
        });
        if changed {
            log::info!("session gate is {status}");
            if let Some(route) = status.route() {
                if let Err(e) = self.navigator.execute(Redirect(route)).await {
                    log::error!("failed to redirect to `{route}`: {e}");
                }
            }
        }

        status
    }
}

impl<Idp, Docs, Store, N> Task<Start<Changes>>
    for SessionGate<Service<Idp, Docs, Store>, N>
where
    Idp: Identity<
            Subscribe<Changes>,
            Ok = identity::Subscription,
            Err = Traced<identity::Error>,
        > + Identity<
            Select<By<Option<Session>, Current>>,
            Ok = Option<Session>,
            Err = Traced<identity::Error>,
        >,
    Store: LocalStore<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<local_store::Error>,
        > + LocalStore<Clear, Ok = (), Err = Traced<local_store::Error>>
        + LocalStore<
            Insert<(Key, String)>,
            Ok = (),
            Err = Traced<local_store::Error>,
        >,
    N: Navigator<Redirect, Ok = (), Err: fmt::Display>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: Start<Changes>) -> Result<Self::Ok, Self::Err> {
        // Subscribing first, so no change slips between the reconciliation
        // and the first notification.
        let subscription =
            self.service.identity().execute(Subscribe(Changes)).await;

        _ = self.reconcile().await;

        let mut subscription = subscription
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
        while let Some(session) = subscription.next().await {
            _ = self.on_session_changed(session).await;
        }

        log::info!("`Identity` stopped reporting `Session` changes");
        Ok(())
    }
}

/// Error of [`SessionGate`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Identity`] provider error.
    #[display("`Identity` operation failed: {_0}")]
    Identity(identity::Error),

    /// [`LocalStore`] error.
    #[display("`LocalStore` operation failed: {_0}")]
    LocalStore(local_store::Error),
}
