//! Applies command-line overrides on top of the loaded configuration.
//!
//! Precedence, highest first: command flags, global flags, `WIDGETS_*`
//! variables, configuration files.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration the way the global flags ask for.
    ///
    /// `--config` replaces the layered files with one file; `--env` picks the
    /// environment layer.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config.as_ref() {
            Some(path) => ConfigLoader::from_file(path),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        tracing::debug!(
            environment = loader.environment().as_str(),
            config_dir = %loader.config_dir().display(),
            "Loading configuration"
        );

        Ok(Self::new(loader.load()?))
    }

    /// Returns a validated copy of the base configuration with overrides applied.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        match &cli.command {
            Some(Commands::Serve {
                host,
                port,
                log_level,
                ..
            }) => {
                if let Some(host) = host {
                    config.server.host = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                if let Some(level) = log_level {
                    config.logger.level = level.as_str().to_string();
                }
            }
            Some(Commands::WidgetA(_)) | Some(Commands::WidgetB(_)) => {
                // Keep client output readable
                if !cli.verbose && !cli.quiet {
                    config.logger.level = "warn".to_string();
                }
                if let Some(url) = cli.api_url() {
                    config.client.base_url = url.to_string();
                }
            }
            Some(Commands::Migrate { .. }) | None => {}
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}
