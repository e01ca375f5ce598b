//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use simplegeo::config::{config_file_path, ConfigFileError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Missing OAuth credentials
    Credentials,
    /// Failed to build the client
    ClientCreation(simplegeo::Error),
    /// A request failed locally or remotely
    Request(simplegeo::Error),
    /// Bad command-line input
    InvalidInput(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Credentials => {
                eprintln!();
                eprintln!("Set your OAuth key and secret in:");
                eprintln!("  {}", config_file_path().display());
                eprintln!("Run 'simplegeo config init' to create the file.");
            }
            CliError::Request(e) if e.code() == Some(401) => {
                eprintln!();
                eprintln!("The server rejected the request signature. Check that:");
                eprintln!("  1. The key and secret in the config file are correct");
                eprintln!("  2. The system clock is accurate");
            }
            CliError::ClientCreation(_) => {
                eprintln!();
                eprintln!("If ca_certs is set, make sure it points at a PEM bundle.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Credentials => write!(f, "No OAuth credentials configured"),
            CliError::ClientCreation(e) => write!(f, "Failed to create client: {}", e),
            CliError::Request(e) => write!(f, "Request failed: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ClientCreation(e) => Some(e),
            CliError::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<simplegeo::Error> for CliError {
    fn from(e: simplegeo::Error) -> Self {
        CliError::Request(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}
