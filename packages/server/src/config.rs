use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::domains::clubs::RegistrationMode;

/// Default bound on each backend call.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 15;

/// Which record store the board talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Direct PostgreSQL connection
    Postgres { database_url: String },
    /// Managed backend's REST query API
    Rest { api_url: String, api_key: String },
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub remote_timeout: Duration,
    pub club_registration: RegistrationMode,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = match var("BOARD_BACKEND").as_deref().unwrap_or("postgres") {
            "postgres" => Backend::Postgres {
                database_url: var("DATABASE_URL").context("DATABASE_URL must be set")?,
            },
            "rest" => Backend::Rest {
                api_url: var("BOARD_API_URL")
                    .context("BOARD_API_URL must be set for the rest backend")?,
                api_key: var("BOARD_API_KEY")
                    .context("BOARD_API_KEY must be set for the rest backend")?,
            },
            other => bail!("BOARD_BACKEND must be 'postgres' or 'rest', got '{}'", other),
        };

        let remote_timeout = match var("BOARD_REMOTE_TIMEOUT_SECS") {
            Some(secs) => secs
                .parse()
                .context("BOARD_REMOTE_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_REMOTE_TIMEOUT_SECS,
        };
        if remote_timeout == 0 {
            bail!("BOARD_REMOTE_TIMEOUT_SECS must be greater than zero");
        }

        let club_registration = match var("BOARD_CLUB_REGISTRATION").as_deref() {
            None | Some("lookup") => RegistrationMode::LookupThenInsert,
            Some("atomic") => RegistrationMode::AtomicUpsert,
            Some(other) => bail!(
                "BOARD_CLUB_REGISTRATION must be 'lookup' or 'atomic', got '{}'",
                other
            ),
        };

        Ok(Self {
            backend,
            remote_timeout: Duration::from_secs(remote_timeout),
            club_registration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn postgres_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/clubs")]).unwrap();
        assert_eq!(
            config.backend,
            Backend::Postgres {
                database_url: "postgres://localhost/clubs".into()
            }
        );
        assert_eq!(config.remote_timeout, Duration::from_secs(15));
        assert_eq!(config.club_registration, RegistrationMode::LookupThenInsert);
    }

    #[test]
    fn rest_backend_needs_url_and_key() {
        let err = load(&[("BOARD_BACKEND", "rest"), ("BOARD_API_URL", "https://x.example.co")])
            .unwrap_err();
        assert!(err.to_string().contains("BOARD_API_KEY"));

        let config = load(&[
            ("BOARD_BACKEND", "rest"),
            ("BOARD_API_URL", "https://x.example.co"),
            ("BOARD_API_KEY", "anon"),
            ("BOARD_CLUB_REGISTRATION", "atomic"),
            ("BOARD_REMOTE_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert!(matches!(config.backend, Backend::Rest { .. }));
        assert_eq!(config.club_registration, RegistrationMode::AtomicUpsert);
        assert_eq!(config.remote_timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(load(&[("BOARD_BACKEND", "sqlite")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("BOARD_CLUB_REGISTRATION", "merge")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("BOARD_REMOTE_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgres://x"), ("BOARD_REMOTE_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[]).is_err());
    }
}
