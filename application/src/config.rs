//! [`Config`]-related definitions.

use std::{num::NonZeroUsize, path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::{l10n::Locale, RestoredSession};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Client behavior configuration.
    #[serde(default)]
    pub client: Client,

    /// Local session storage configuration.
    #[serde(default)]
    pub storage: Storage,

    /// Roster documents configuration.
    #[serde(default)]
    pub documents: Documents,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Client behavior configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Client {
    /// Number of students fetched per page.
    #[default(NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN))]
    pub page_size: NonZeroUsize,

    /// Time the startup session check may take before signing out.
    #[default(time::Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub reconcile_timeout: time::Duration,

    /// Policy for a session restored by the identity provider without a
    /// local trace.
    pub restored_session: RestoredSession,

    /// Language of the user-facing texts.
    pub locale: Locale,
}

impl From<Client> for service::Config {
    fn from(value: Client) -> Self {
        let Client {
            page_size,
            reconcile_timeout,
            restored_session,
            locale: _,
        } = value;
        Self {
            page_size,
            reconcile_timeout,
            restored_session,
        }
    }
}

/// Local session storage configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Storage {
    /// Path to the file keeping the signed in user summary.
    #[default(PathBuf::from("session.json"))]
    pub path: PathBuf,
}

/// Roster documents configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Documents {
    /// Path to a JSON file with the students to serve, if any.
    pub path: Option<PathBuf>,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{env, fs};

    use service::{l10n::Locale, RestoredSession};

    use super::{Config, LogLevel};

    #[test]
    fn defaults_without_file() {
        let config = Config::new("/definitely/not/here").unwrap();

        assert_eq!(config.client.page_size.get(), 10);
        assert_eq!(config.client.reconcile_timeout.as_secs(), 5);
        assert_eq!(config.client.restored_session, RestoredSession::Discard);
        assert_eq!(config.client.locale, Locale::En);
        assert_eq!(config.storage.path.to_str(), Some("session.json"));
        assert!(config.documents.path.is_none());
        assert!(matches!(config.log.level, LogLevel::Info));
    }

    #[test]
    fn reads_toml_file() {
        let path = env::temp_dir().join("roster-config-spec.toml");
        fs::write(
            &path,
            r#"
                [client]
                page_size = 3
                reconcile_timeout = "250ms"
                restored_session = "ADOPT"
                locale = "ID"

                [documents]
                path = "students.json"

                [log]
                level = "DEBUG"
            "#,
        )
        .unwrap();

        let config = Config::new(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.client.page_size.get(), 3);
        assert_eq!(config.client.reconcile_timeout.as_millis(), 250);
        assert_eq!(config.client.restored_session, RestoredSession::Adopt);
        assert_eq!(config.client.locale, Locale::Id);
        assert_eq!(
            config.documents.path.as_deref().and_then(|p| p.to_str()),
            Some("students.json"),
        );
        assert!(matches!(config.log.level, LogLevel::Debug));
    }
}
