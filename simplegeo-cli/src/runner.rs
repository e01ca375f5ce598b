//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization and client creation
//! to reduce duplication across command handlers.

use serde::Serialize;
use tracing::info;

use simplegeo::config::ConfigFile;
use simplegeo::logging::{init_logging, split_log_path, LoggingGuard};
use simplegeo::{Client, ClientConfig};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional debug logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, enables debug-level logging and mirrors
    ///   log output to stderr
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, debug_mode, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("SimpleGeo v{}", simplegeo::VERSION);
        info!(host = %self.config.api.host, "SimpleGeo CLI: {} command", command);
    }

    /// Create a client from the loaded configuration.
    pub fn create_client(&self) -> Result<Client, CliError> {
        let config = ClientConfig::try_from(&self.config).map_err(|_| CliError::Credentials)?;
        Client::with_config(config).map_err(CliError::ClientCreation)
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidInput(format!("cannot render output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
