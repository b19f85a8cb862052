//! Errors that stop a whole run.
//!
//! Per-file problems never surface here; they are counted in the batch
//! summary instead.

use crate::config::ConfigError;
use crate::scan::ScanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or compiled.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// The source directory could not be listed.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_config_error_message_has_a_single_prefix() {
        let error = Error::from(ConfigError::ConfigNotFound(PathBuf::from("/etc/renfiles.toml")));
        assert_eq!(
            error.to_string(),
            "Failed to load configuration: Configuration file not found: /etc/renfiles.toml"
        );
    }
}

