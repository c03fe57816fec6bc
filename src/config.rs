//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Database ===
    /// Postgres connection string used by the liveness probe.
    pub database_url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection; also bounds each probe.
    #[serde(default = "default_acquire_timeout")]
    pub db_acquire_timeout_secs: u64,

    // === Service ===
    /// Name reported by the root endpoint.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser (comma-separated).
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    // === Build Metadata ===
    /// Commit the binary was built from.
    #[serde(default)]
    pub git_commit: Option<String>,

    /// Branch the binary was built from.
    #[serde(default)]
    pub git_branch: Option<String>,

    /// Build timestamp.
    #[serde(default)]
    pub build_time: Option<String>,

    /// Release version.
    #[serde(default)]
    pub app_version: Option<String>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    3
}

fn default_service_name() -> String {
    "snjv-api".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "https://app.snjv.us".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build a config around a database URL with every other field defaulted.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_max_connections: default_max_connections(),
            db_acquire_timeout_secs: default_acquire_timeout(),
            service_name: default_service_name(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            metrics_enabled: true,
            git_commit: None,
            git_branch: None,
            build_time: None,
            app_version: None,
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err("DATABASE_URL must be a postgres:// or postgresql:// URL".to_string());
        }

        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be at least 1".to_string());
        }

        if self.db_acquire_timeout_secs == 0 {
            return Err("DB_ACQUIRE_TIMEOUT_SECS must be at least 1".to_string());
        }

        Ok(())
    }

    /// Probe and pool acquisition timeout.
    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }

    /// Non-empty, trimmed CORS origins. Empty means any origin.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Database URL with the password replaced, safe for logs.
    pub fn redacted_database_url(&self) -> String {
        let Some((scheme, rest)) = self.database_url.split_once("://") else {
            return "<unparseable>".to_string();
        };
        match rest.split_once('@') {
            Some((creds, host)) => {
                let user = creds.split(':').next().unwrap_or_default();
                format!("{scheme}://{user}:***@{host}")
            }
            None => self.database_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_service_name(), "snjv-api");
        assert_eq!(default_port(), 8080);
        assert_eq!(default_acquire_timeout(), 3);
        assert_eq!(default_cors_origins().len(), 2);
        assert!(default_true());
    }

    #[test]
    fn validate_rejects_empty_database_url() {
        let config = Config::with_database_url("");
        assert!(config.validate().is_err());
    }

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter::<_, Config>(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn missing_database_url_fails_to_load() {
        let err = from_pairs(&[("PORT", "9000")]).unwrap_err();
        assert!(
            matches!(&err, envy::Error::MissingValue(field) if *field == "database_url"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn loads_defaults_from_environment() {
        let config = from_pairs(&[("DATABASE_URL", "postgres://app@db/app")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.service_name, "snjv-api");
        assert_eq!(config.allowed_origins().len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_cors_origins_means_any_origin() {
        let config = from_pairs(&[
            ("DATABASE_URL", "postgres://app@db/app"),
            ("CORS_ORIGINS", ""),
        ])
        .unwrap();
        assert!(config.allowed_origins().is_empty());
    }

    #[test]
    fn cors_origins_split_on_commas() {
        let config = from_pairs(&[
            ("DATABASE_URL", "postgres://app@db/app"),
            ("CORS_ORIGINS", "https://x, https://y"),
        ])
        .unwrap();
        assert_eq!(
            config.allowed_origins(),
            vec!["https://x".to_string(), "https://y".to_string()]
        );
    }

    #[test]
    fn validate_rejects_non_postgres_scheme() {
        let config = Config::with_database_url("mysql://root@localhost/app");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_pool_settings() {
        let mut config = Config::with_database_url("postgres://app@localhost/app");
        assert!(config.validate().is_ok());

        config.db_max_connections = 0;
        assert!(config.validate().is_err());

        config.db_max_connections = 1;
        config.db_acquire_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn allowed_origins_drops_blanks() {
        let mut config = Config::with_database_url("postgres://app@localhost/app");
        config.cors_origins = vec!["".to_string(), " https://a.example ".to_string()];
        assert_eq!(config.allowed_origins(), vec!["https://a.example".to_string()]);

        config.cors_origins = vec![String::new()];
        assert!(config.allowed_origins().is_empty());
    }

    #[test]
    fn redacts_password() {
        let config = Config::with_database_url("postgres://app:hunter2@db:5432/app");
        assert_eq!(config.redacted_database_url(), "postgres://app:***@db:5432/app");
    }
}
