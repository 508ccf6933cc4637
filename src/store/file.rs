use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::error::{ModelKeyError, SubmitError};
use crate::form::SubmissionPayload;
use crate::registry::ProviderKey;
use crate::store::{Ack, CredentialSink};

pub const CREDENTIALS_FILE: &str = "credentials.json";

/// Keeps credentials in a JSON file, one object per provider:
///
/// ```json
/// { "gemini": { "gemini_api_key": "..." } }
/// ```
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored credentials keyed by provider id. A missing file means nothing
    /// has been configured yet.
    pub fn load(&self) -> Result<BTreeMap<String, SubmissionPayload>, ModelKeyError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, provider: ProviderKey, payload: &SubmissionPayload) -> Result<(), ModelKeyError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut stored: Value = if self.path.exists() {
            let content = fs::read_to_string(&self.path)?;
            serde_json::from_str(&content)?
        } else {
            json!({})
        };
        if !stored.is_object() {
            return Err(ModelKeyError::ConfigurationError(format!(
                "{} does not contain a JSON object",
                self.path.display()
            )));
        }

        // replaces the whole entry: keys left blank this time are dropped
        stored[provider.as_str()] = serde_json::to_value(payload)?;

        let content = serde_json::to_string_pretty(&stored)?;
        self.replace_contents(content.as_bytes())?;

        tracing::debug!(provider = %provider, path = %self.path.display(), "credentials written");
        Ok(())
    }
}

impl FileCredentialStore {
    /// Writes a private sibling file and renames it over the target, so the
    /// secrets are never readable by others and a crash leaves the old file.
    fn replace_contents(&self, content: &[u8]) -> std::io::Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        match fs::remove_file(&tmp) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        let mut file = secure_open_options().write(true).create_new(true).open(&tmp)?;
        file.write_all(content)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)
    }
}

fn secure_open_options() -> OpenOptions {
    let mut opts = OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    opts
}

#[async_trait]
impl CredentialSink for FileCredentialStore {
    async fn submit_credentials(
        &self,
        provider: ProviderKey,
        payload: &SubmissionPayload,
    ) -> Result<Ack, SubmitError> {
        let _guard = self.write_lock.lock().await;
        self.save(provider, payload)
            .map(|()| Ack {
                saved_to: self.path.display().to_string(),
            })
            .map_err(|e| SubmitError::new(format!("could not save credentials: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileCredentialStore) {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(dir.path().join("modelkey").join(CREDENTIALS_FILE));
        (dir, store)
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_writes_provider_entry() {
        let (_dir, store) = temp_store();
        let payload: SubmissionPayload = [("gemini_api_key", "abc123")].into_iter().collect();

        let ack = store
            .submit_credentials(ProviderKey::Gemini, &payload)
            .await
            .unwrap();
        assert_eq!(ack.saved_to, store.path().display().to_string());

        let stored = store.load().unwrap();
        assert_eq!(stored.get("gemini"), Some(&payload));
    }

    #[tokio::test]
    async fn test_submit_keeps_other_providers() {
        let (_dir, store) = temp_store();
        let gemini: SubmissionPayload = [("gemini_api_key", "abc123")].into_iter().collect();
        let cohere: SubmissionPayload = [("api_key", "co-key")].into_iter().collect();
        let replaced: SubmissionPayload = [("gemini_api_key", "def456")].into_iter().collect();

        store.submit_credentials(ProviderKey::Gemini, &gemini).await.unwrap();
        store.submit_credentials(ProviderKey::Cohere, &cohere).await.unwrap();
        store.submit_credentials(ProviderKey::Gemini, &replaced).await.unwrap();

        let stored = store.load().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.get("cohere"), Some(&cohere));
        assert_eq!(stored.get("gemini"), Some(&replaced));
    }

    #[tokio::test]
    async fn test_corrupt_file_becomes_submit_error() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[1, 2, 3]").unwrap();

        let payload: SubmissionPayload = [("api_key", "k")].into_iter().collect();
        let err = store
            .submit_credentials(ProviderKey::Jina, &payload)
            .await
            .unwrap_err();
        assert!(err.message.contains("does not contain a JSON object"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = temp_store();
        let payload: SubmissionPayload = [("api_key", "k")].into_iter().collect();
        store.submit_credentials(ProviderKey::Jina, &payload).await.unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_rewrite_replaces_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"cohere": {"api_key": "co-key"}}"#).unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        let payload: SubmissionPayload = [("api_key", "k")].into_iter().collect();
        store.submit_credentials(ProviderKey::Jina, &payload).await.unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600, "rewritten file must be private");
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_temp_file_is_replaced() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        let tmp = store.path().with_extension("json.tmp");
        fs::write(&tmp, "partial write").unwrap();

        let payload: SubmissionPayload = [("gemini_api_key", "abc123")].into_iter().collect();
        store.submit_credentials(ProviderKey::Gemini, &payload).await.unwrap();

        assert!(!tmp.exists(), "temp file should be renamed away");
        assert_eq!(store.load().unwrap().get("gemini"), Some(&payload));
    }
}
