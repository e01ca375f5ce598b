//! Configuration management CLI commands.
//!
//! Provides `config init`, `config path` and `config show` for creating and
//! inspecting `~/.simplegeo/config.ini`.

use clap::Subcommand;
use simplegeo::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Create the configuration file with default settings
    Init,

    /// Show the configuration file path
    Path,

    /// Show the effective configuration (secret masked)
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init => run_init(),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
    }
}

fn run_init() -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() {
        println!("Configuration file already exists: {}", path.display());
        return Ok(());
    }

    let path = ConfigFile::ensure_exists()?;
    println!("Created {}", path.display());
    println!("Add your OAuth key and secret under [credentials].");
    Ok(())
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    for (key, value) in describe(&config) {
        println!("{:<20} {}", key, value);
    }
    Ok(())
}

/// Flattens the config into `section.key` / display-value pairs.
fn describe(config: &ConfigFile) -> Vec<(&'static str, String)> {
    let unset = || "(not set)".to_string();
    vec![
        (
            "credentials.key",
            config.credentials.key.clone().unwrap_or_else(unset),
        ),
        (
            "credentials.secret",
            config
                .credentials
                .secret
                .as_ref()
                .map(|s| mask(s))
                .unwrap_or_else(unset),
        ),
        ("api.host", config.api.host.clone()),
        ("api.port", config.api.port.to_string()),
        ("api.version", config.api.version.clone()),
        ("api.realm", config.api.realm.clone()),
        ("transport.timeout", config.transport.timeout.to_string()),
        (
            "transport.ca_certs",
            config
                .transport
                .ca_certs
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(unset),
        ),
        ("logging.file", config.logging.file.display().to_string()),
    ]
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    format!("{}{}", visible, "*".repeat(secret.chars().count().saturating_sub(2)))
}
