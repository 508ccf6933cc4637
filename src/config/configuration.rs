use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

use crate::config::cli::Cli;
use crate::config::config_dir;
use crate::error::ModelKeyError;
use crate::locale::Locale;
use crate::store::{CredentialSink, FileCredentialStore, HttpCredentialSink, CREDENTIALS_FILE};

pub const CONFIG_FILE: &str = "modelkey.config.json";

/// Contents of `~/.config/modelkey/modelkey.config.json`. Every key is
/// optional; command-line flags and environment variables win.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub locale: Option<String>,
    pub backend_url: Option<String>,
    pub api_token: Option<String>,
    pub credentials_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ModelKeyError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            ModelKeyError::ConfigurationError(format!("invalid config file {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    File { path: PathBuf },
    Http { base_url: Url, api_token: Option<String> },
}

#[derive(Debug)]
pub struct ModelKeyConfig {
    pub locale: Locale,
    pub backend: Backend,
}

impl ModelKeyConfig {
    pub fn build(cli: &Cli) -> Result<Self, ModelKeyError> {
        let dir = config_dir()?;
        let file = FileConfig::load(&dir.join(CONFIG_FILE))?;
        Self::resolve(cli, file, &dir)
    }

    fn resolve(cli: &Cli, file: FileConfig, dir: &Path) -> Result<Self, ModelKeyError> {
        let locale = match (cli.locale, file.locale) {
            (Some(locale), _) => locale,
            (None, Some(code)) => code.parse()?,
            (None, None) => Locale::detect(),
        };

        let backend = match cli.backend_url.clone().or(file.backend_url) {
            Some(url) => Backend::Http {
                base_url: Url::parse(&url).map_err(|e| {
                    ModelKeyError::ConfigurationError(format!("invalid backend URL `{}`: {}", url, e))
                })?,
                api_token: cli.api_token.clone().or(file.api_token),
            },
            None => Backend::File {
                path: file
                    .credentials_file
                    .unwrap_or_else(|| dir.join(CREDENTIALS_FILE)),
            },
        };

        tracing::debug!(locale = %locale, backend = ?backend_kind(&backend), "configuration resolved");
        Ok(Self { locale, backend })
    }

    pub fn sink(&self) -> Result<Box<dyn CredentialSink>, ModelKeyError> {
        match &self.backend {
            Backend::File { path } => Ok(Box::new(FileCredentialStore::new(path.clone()))),
            Backend::Http {
                base_url,
                api_token,
            } => Ok(Box::new(HttpCredentialSink::new(
                base_url.clone(),
                api_token.clone(),
            )?)),
        }
    }

    /// The local credentials file. Only available with the file backend.
    pub fn file_store(&self) -> Result<FileCredentialStore, ModelKeyError> {
        match &self.backend {
            Backend::File { path } => Ok(FileCredentialStore::new(path.clone())),
            Backend::Http { base_url, .. } => Err(ModelKeyError::ConfigurationError(format!(
                "credentials are stored by {}; `show` only reads the local credentials file",
                base_url
            ))),
        }
    }
}

// keeps the api token out of the log line
fn backend_kind(backend: &Backend) -> &'static str {
    match backend {
        Backend::File { .. } => "file",
        Backend::Http { .. } => "http",
    }
}
