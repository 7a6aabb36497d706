//! [`Query`] of the locally cached user profile.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{
        local_store::{self, Key},
        LocalStore,
    },
    l10n::{Locale, Localize as _, Text},
    Service,
};

use super::Query;

/// Queries the profile of the signed in user as mirrored into the
/// [`LocalStore`], without any round-trip to the identity provider.
#[derive(Clone, Copy, Debug)]
pub struct Cached;

/// Locally cached profile of the signed in user.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Profile {
    /// Cached user ID, if any.
    pub user_id: Option<String>,

    /// Cached email, if any.
    pub email: Option<String>,

    /// Cached display name, if any.
    pub name: Option<String>,
}

impl Profile {
    /// Returns the name to greet the user with, falling back to
    /// [`Text::DefaultUserName`].
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| Text::DefaultUserName.localize(locale))
    }

    /// Returns the name to greet the user with on the dashboard: the cached
    /// name, then the cached email, then [`Text::DefaultUserName`].
    #[must_use]
    pub fn greeting(&self, locale: Locale) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| Text::DefaultUserName.localize(locale))
    }
}

impl<Idp, Docs, Store> Query<Cached> for Service<Idp, Docs, Store>
where
    Store: LocalStore<
        Select<By<Option<String>, Key>>,
        Ok = Option<String>,
        Err = Traced<local_store::Error>,
    >,
{
    type Ok = Profile;
    type Err = Traced<local_store::Error>;

    async fn execute(&self, _: Cached) -> Result<Self::Ok, Self::Err> {
        let get = |key: Key| async move {
            self.local_store()
                .execute(Select(By::new(key)))
                .await
                .map_err(tracerr::wrap!())
        };

        Ok(Profile {
            user_id: get(Key::UserId).await?,
            email: get(Key::UserEmail).await?,
            name: get(Key::UserName).await?,
        })
    }
}

#[cfg(test)]
mod spec {
    use common::{operations::Insert, Handler as _};

    use crate::{infra::local_store::Key, l10n::Locale, test_service};

    use super::{Cached, Profile};

    #[tokio::test]
    async fn reads_mirrored_fields() {
        let service = test_service::new();
        for (key, value) in [(Key::UserId, "u1"), (Key::UserEmail, "budi@a.id")]
        {
            service
                .local_store()
                .execute(Insert((key, value.to_owned())))
                .await
                .unwrap();
        }

        let profile = service.execute(Cached).await.unwrap();

        assert_eq!(
            profile,
            Profile {
                user_id: Some("u1".to_owned()),
                email: Some("budi@a.id".to_owned()),
                name: None,
            },
        );
        assert_eq!(profile.display_name(Locale::Id), "Pengguna");
        assert_eq!(profile.greeting(Locale::Id), "budi@a.id");
    }

    #[test]
    fn greets_by_name_first() {
        let mut profile = Profile {
            user_id: Some("u1".to_owned()),
            email: Some("budi@a.id".to_owned()),
            name: Some("Budi".to_owned()),
        };
        assert_eq!(profile.greeting(Locale::En), "Budi");

        profile.email = None;
        profile.name = None;
        assert_eq!(profile.greeting(Locale::En), "User");
    }
}
