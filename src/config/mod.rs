use std::path::PathBuf;

use dirs::home_dir;

use crate::error::ModelKeyError;

pub mod cli;
pub mod configuration;

pub use configuration::ModelKeyConfig;

/// `~/.config/modelkey`
pub fn config_dir() -> Result<PathBuf, ModelKeyError> {
    let mut path = home_dir().ok_or_else(|| {
        ModelKeyError::ConfigurationError("Could not determine home directory".to_string())
    })?;
    path.push(".config");
    path.push("modelkey");
    Ok(path)
}
