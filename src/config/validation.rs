//! Configuration validation
//!
//! Every section checks its own ranges; [`Settings::validate`] reports the
//! first failure.

use crate::config::error::ConfigError;
use crate::config::settings::{
    ClientConfig, DatabaseConfig, FileSettings, LoggerSettings, ServerConfig, Settings,
    StorageBackend,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

const VALID_DATABASE_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

/// Largest page the API serves
pub const MAX_PAGE_SIZE: u32 = 100;

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if let Some(origin) = self
            .cors_origins
            .iter()
            .find(|o| o.as_str() != "*" && !is_http_url(o))
        {
            return Err(ConfigError::validation(
                "server.cors_origins",
                format!("Invalid origin '{origin}'. Origins must start with http:// or https://, or be \"*\"."),
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// The URL is only required for the postgres backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StorageBackend::Postgres {
            if self.url.is_empty() {
                return Err(ConfigError::validation(
                    "database.url",
                    "Database URL is required. Please specify a valid database connection string.",
                ));
            }

            if !VALID_DATABASE_SCHEMES
                .iter()
                .any(|scheme| self.url.starts_with(scheme))
            {
                return Err(ConfigError::validation(
                    "database.url",
                    "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
                ));
            }
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.file.format",
                format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(
                "logger.level",
                format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        self.file.validate()
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.base_url) {
            return Err(ConfigError::validation(
                "client.base_url",
                format!(
                    "Invalid API base URL '{}'. Expected http:// or https://",
                    self.base_url
                ),
            ));
        }

        if self.timeout == 0 {
            return Err(ConfigError::validation(
                "client.timeout",
                "Client timeout must be greater than 0 seconds.",
            ));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::validation(
                "client.page_size",
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}."),
            ));
        }

        Ok(())
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        self.client.validate()?;
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_default_settings_valid() {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/widgets".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_server_config_cors_origins() {
        let mut config = ServerConfig {
            cors_origins: vec!["*".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.cors_origins = vec!["localhost:3000".to_string()];
        assert_eq!(field_of(config.validate().unwrap_err()), "server.cors_origins");
    }

    #[test]
    fn test_database_url_required_only_for_postgres() {
        let mut config = DatabaseConfig::default();
        assert_eq!(field_of(config.validate().unwrap_err()), "database.url");

        config.backend = StorageBackend::Memory;
        assert!(config.validate().is_ok());

        config.backend = StorageBackend::Postgres;
        config.url = "mysql://localhost/widgets".to_string();
        assert_eq!(field_of(config.validate().unwrap_err()), "database.url");

        config.url = "postgresql://localhost/widgets".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_min_exceeds_max() {
        let config = DatabaseConfig {
            backend: StorageBackend::Memory,
            max_connections: 2,
            min_connections: 5,
            ..Default::default()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "database.min_connections"
        );
    }

    #[test]
    fn test_logger_invalid_level() {
        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.level");
    }

    #[test]
    fn test_logger_file_enabled_requires_path() {
        let mut settings = LoggerSettings::default();
        settings.file.enabled = true;
        settings.file.path = "  ".to_string();
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.file.path");
    }

    #[test]
    fn test_client_base_url_scheme() {
        let config = ClientConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "client.base_url");
    }

    proptest! {
        #[test]
        fn prop_client_page_size_range(page_size in 0u32..500) {
            let config = ClientConfig { page_size, ..Default::default() };
            let valid = (1..=MAX_PAGE_SIZE).contains(&page_size);
            prop_assert_eq!(config.validate().is_ok(), valid);
        }

        #[test]
        fn prop_valid_ports_accepted(port in 1u16..=u16::MAX) {
            let config = ServerConfig { port, ..Default::default() };
            prop_assert!(config.validate().is_ok());
        }
    }
}
