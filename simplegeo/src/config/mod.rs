//! User configuration
//!
//! The INI file at `~/.simplegeo/config.ini` holds credentials, the API
//! location, transport settings and the log file path. Missing keys fall
//! back to the `DEFAULT_*` constants.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    DEFAULT_API_VERSION, DEFAULT_HOST, DEFAULT_LOG_FILE_NAME, DEFAULT_PORT, DEFAULT_REALM,
    DEFAULT_TIMEOUT_SECS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ApiSettings, ConfigFile, CredentialsSettings, LoggingSettings, TransportSettings,
};
