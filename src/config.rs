//! Service configuration.

use serde::{Deserialize, Serialize};

/// Tunable parameters for the authentication core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Seconds an issued session challenge stays valid.
    pub session_ttl_secs: u64,
    /// Maximum live (issued, unconsumed) sessions held in memory.
    pub max_live_sessions: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 300,
            max_live_sessions: 50_000,
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from `.env`, a TOML file, and environment variables.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables with `AUTH_` prefix (e.g. `AUTH_SESSION_TTL_SECS=600`)
    /// 2. TOML file at `AUTH_CONFIG_PATH` (default `config/auth.toml`)
    /// 3. `.env` file, searched up the directory tree
    /// 4. Built-in defaults
    ///
    /// Missing `.env` or TOML files are skipped silently.
    ///
    /// # Errors
    /// Returns an error if a present configuration source is malformed.
    pub fn from_env() -> figment::error::Result<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        let _ = dotenvy::dotenv();

        let config_path =
            std::env::var("AUTH_CONFIG_PATH").unwrap_or_else(|_| "config/auth.toml".to_string());

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("AUTH_"))
            .extract()
    }

    /// Rejects configurations that would disable core guarantees.
    ///
    /// # Errors
    /// Returns a message describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.session_ttl_secs == 0 {
            return Err("session_ttl_secs cannot be zero".to_string());
        }

        if self.max_live_sessions == 0 {
            return Err("max_live_sessions cannot be zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServiceConfig::default();
        assert_eq!(config.session_ttl_secs, 300);
        assert_eq!(config.max_live_sessions, 50_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_ttl() {
        let config = ServiceConfig {
            session_ttl_secs: 0,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let config = ServiceConfig {
            max_live_sessions: 0,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
