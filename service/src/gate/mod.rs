//! Session gate definitions.
//!
//! The gate decides whether the user may stay in the authenticated area. The
//! decisions themselves are pure functions here, while their effects are
//! applied by the [`SessionGate`] task.
//!
//! [`SessionGate`]: crate::task::SessionGate

use std::convert::Infallible;

use derive_more::Display;
use serde::Deserialize;
use strum::EnumString;
use tokio::sync::mpsc;
use tracing as log;

use crate::domain::Session;

/// Navigation operation driven by the session gate.
pub use common::Handler as Navigator;

/// Authentication status reported by the session gate.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum Status {
    /// Startup reconciliation hasn't completed yet.
    #[default]
    #[display("initializing")]
    Initializing,

    /// User is signed in.
    #[display("authenticated")]
    Authenticated,

    /// User is signed out.
    #[display("unauthenticated")]
    Unauthenticated,
}

impl Status {
    /// Returns the [`Route`] this [`Status`] redirects to, if any.
    #[must_use]
    pub fn route(self) -> Option<Route> {
        match self {
            Self::Initializing => None,
            Self::Authenticated => Some(Route::Home),
            Self::Unauthenticated => Some(Route::Login),
        }
    }
}

/// Screen the user can be navigated to.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Route {
    /// Login entry of the unauthenticated area.
    #[display("login")]
    Login,

    /// Root of the authenticated area.
    #[display("home")]
    Home,
}

/// [`Navigator`] operation replacing the current screen with a [`Route`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Redirect(pub Route);

/// [`Navigator`] delivering [`Route`]s into a channel.
#[derive(Clone, Debug)]
pub struct Routes(mpsc::UnboundedSender<Route>);

impl Routes {
    /// Creates a new [`Routes`] navigator along with the receiver of its
    /// [`Route`]s.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl Navigator<Redirect> for Routes {
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Redirect(route): Redirect,
    ) -> Result<Self::Ok, Self::Err> {
        if self.0.send(route).is_err() {
            log::debug!("no one listens for `Route::{route:?}` anymore");
        }
        Ok(())
    }
}

/// Policy applied when the identity provider has restored a session that
/// the local store knows nothing about.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, EnumString, Eq, PartialEq,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(ascii_case_insensitive)]
pub enum RestoredSession {
    /// Treat the user as signed out, leaving the store untouched.
    #[default]
    #[display("discard")]
    Discard,

    /// Treat the user as signed in, mirroring the session into the store.
    #[display("adopt")]
    Adopt,
}

/// Effect to apply on the local store along with a gate [`Decision`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    /// Nothing to do.
    None,

    /// Remove the mirrored session summary.
    ClearCache,

    /// Replace the mirrored session summary with the provided [`Session`].
    Mirror(Session),
}

/// Outcome of a gate decision.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decision {
    /// [`Status`] to transition into.
    pub status: Status,

    /// [`Effect`] to apply before transitioning.
    pub effect: Effect,
}

/// Decides the startup [`Status`] from the cached user ID and the [`Session`]
/// reported by the identity provider.
#[must_use]
pub fn reconcile(
    cached: Option<&str>,
    live: Option<Session>,
    policy: RestoredSession,
) -> Decision {
    let (status, effect) = match (cached, live) {
        (Some(cached), Some(live)) if live.user_id.to_string() == cached => {
            (Status::Authenticated, Effect::None)
        }
        // Summary of a previous user is stale.
        (Some(_), Some(live)) => (Status::Authenticated, Effect::Mirror(live)),
        (Some(_), None) => (Status::Unauthenticated, Effect::ClearCache),
        (None, Some(live)) => match policy {
            RestoredSession::Discard => (Status::Unauthenticated, Effect::None),
            RestoredSession::Adopt => {
                (Status::Authenticated, Effect::Mirror(live))
            }
        },
        (None, None) => (Status::Unauthenticated, Effect::None),
    };
    Decision { status, effect }
}

/// Decides the [`Status`] after the identity provider has reported a change
/// of the current [`Session`].
#[must_use]
pub fn on_session_changed(session: Option<&Session>) -> Decision {
    if session.is_some() {
        Decision {
            status: Status::Authenticated,
            effect: Effect::None,
        }
    } else {
        Decision {
            status: Status::Unauthenticated,
            effect: Effect::ClearCache,
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::{user, Session};

    use super::{
        on_session_changed, reconcile, Decision, Effect, RestoredSession,
        Status,
    };

    fn session(id: &str) -> Session {
        Session {
            user_id: user::Id::from(id),
            email: None,
            display_name: None,
        }
    }

    #[test]
    fn reconciles_cache_with_live_session() {
        use Effect as E;
        use RestoredSession::{Adopt, Discard};
        use Status::{Authenticated as In, Unauthenticated as Out};

        for (cached, live, policy, status, effect) in [
            (Some("u1"), Some(session("u1")), Discard, In, E::None),
            (Some("u1"), None, Discard, Out, E::ClearCache),
            (None, Some(session("u1")), Discard, Out, E::None),
            (None, Some(session("u1")), Adopt, In, E::Mirror(session("u1"))),
            (None, None, Discard, Out, E::None),
            (None, None, Adopt, Out, E::None),
            (Some("u0"), Some(session("u1")), Discard, In, {
                E::Mirror(session("u1"))
            }),
        ] {
            assert_eq!(
                reconcile(cached, live, policy),
                Decision { status, effect },
            );
        }
    }

    #[test]
    fn follows_session_changes() {
        assert_eq!(
            on_session_changed(Some(&session("u1"))).status,
            Status::Authenticated,
        );
        assert_eq!(
            on_session_changed(None),
            Decision {
                status: Status::Unauthenticated,
                effect: Effect::ClearCache,
            },
        );
    }

    #[test]
    fn parses_policy() {
        assert_eq!(
            "adopt".parse::<RestoredSession>().unwrap(),
            RestoredSession::Adopt,
        );
        assert_eq!(
            "DISCARD".parse::<RestoredSession>().unwrap(),
            RestoredSession::Discard,
        );
    }
}
