use thiserror::Error;

use crate::form::EngineError;
use crate::locale::Locale;
use crate::registry::ProviderKey;

/// Invariant violations found while assembling the provider registry.
///
/// These are start-up failures: once a registry has been assembled none of
/// them can occur again for the lifetime of the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("provider `{provider}` is registered more than once")]
    DuplicateProvider { provider: ProviderKey },

    #[error("provider `{provider}` declares field `{field}` more than once")]
    DuplicateField { provider: ProviderKey, field: String },

    #[error("provider `{provider}` validates `{field}` but declares no such field")]
    DanglingValidateKey { provider: ProviderKey, field: String },

    #[error("provider `{provider}` lists `{field}` in its validate keys more than once")]
    DuplicateValidateKey { provider: ProviderKey, field: String },

    #[error("provider `{provider}` field `{field}` is required but missing from its validate keys")]
    RequiredNotValidated { provider: ProviderKey, field: String },

    #[error("provider `{provider}` field `{field}` is optional but listed in its validate keys")]
    OptionalValidated { provider: ProviderKey, field: String },

    #[error("provider `{provider}` is missing the `{locale}` translation for `{path}`")]
    MissingTranslation {
        provider: ProviderKey,
        path: String,
        locale: Locale,
    },

    #[error("provider `{provider}` field `{field}`: {reason}")]
    InvalidField {
        provider: ProviderKey,
        field: String,
        reason: String,
    },

    #[error("provider `{provider}` has an invalid `{path}`: {reason}")]
    InvalidPresentation {
        provider: ProviderKey,
        path: String,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("provider `{0}` is not registered")]
    NotFound(ProviderKey),
}

/// Why one field blocked validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    #[error("a value is required")]
    Missing,

    #[error("{reason}")]
    Malformed { reason: String },
}

/// Every field that failed validation, in validate-key order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid fields: {}", describe_issues(&self.issues))]
pub struct ValidationError {
    pub issues: Vec<(String, FieldIssue)>,
}

impl ValidationError {
    pub fn offending_keys(&self) -> Vec<&str> {
        self.issues.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn issue(&self, key: &str) -> Option<&FieldIssue> {
        self.issues
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, issue)| issue)
    }
}

fn describe_issues(issues: &[(String, FieldIssue)]) -> String {
    issues
        .iter()
        .map(|(key, issue)| format!("{} ({})", key, issue))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failure reported by the persistence collaborator. The message is shown
/// to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ModelKeyError {
    #[error("{0}")]
    ConfigurationError(String),

    #[error("registry integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("unknown locale `{0}`")]
    UnknownLocale(String),

    #[error("unknown provider `{0}`")]
    UnknownProvider(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
